//! Audio Storage Port - 出站端口
//!
//! 合成音频的临时存放：播放前写入，完成（任何结果）后释放

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// 音频存储错误
#[derive(Debug, Error)]
pub enum AudioStorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 一段已落盘的合成音频
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub id: Uuid,
    pub path: PathBuf,
    pub size_bytes: u64,
    /// 从 WAV 头探测的时长，探测失败时为 None
    pub duration_ms: Option<u64>,
}

/// Audio Storage Port
#[async_trait]
pub trait AudioStoragePort: Send + Sync {
    /// 保存音频数据，返回新分配的 clip
    async fn save_clip(&self, data: &[u8]) -> Result<AudioClip, AudioStorageError>;

    /// 读取音频数据
    async fn read_clip(&self, clip_id: Uuid) -> Result<Vec<u8>, AudioStorageError>;

    /// 删除音频文件，文件不存在视为成功
    async fn release_clip(&self, clip_id: Uuid) -> Result<(), AudioStorageError>;

    /// 删除所有残留文件，返回删除数量
    async fn purge_all(&self) -> Result<u64, AudioStorageError>;
}
