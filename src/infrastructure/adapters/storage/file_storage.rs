//! File Storage - 文件系统音频存储实现
//!
//! 实现 AudioStoragePort trait，文件名为 `{clip_id}.wav`

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use super::wav_probe::probe_duration_ms;
use crate::application::ports::{AudioClip, AudioStorageError, AudioStoragePort};

fn io_error(e: std::io::Error) -> AudioStorageError {
    AudioStorageError::IoError(e.to_string())
}

/// 文件系统音频存储
pub struct FileAudioStorage {
    /// 存储根目录
    base_dir: PathBuf,
}

impl FileAudioStorage {
    /// 创建新的文件存储
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, AudioStorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir).await.map_err(io_error)?;

        Ok(Self { base_dir })
    }

    /// 获取存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn clip_path(&self, clip_id: Uuid) -> PathBuf {
        self.base_dir.join(format!("{}.wav", clip_id))
    }
}

#[async_trait]
impl AudioStoragePort for FileAudioStorage {
    async fn save_clip(&self, data: &[u8]) -> Result<AudioClip, AudioStorageError> {
        let id = Uuid::new_v4();
        let path = self.clip_path(id);

        fs::write(&path, data).await.map_err(io_error)?;
        let duration_ms = probe_duration_ms(data);

        tracing::debug!(
            clip_id = %id,
            size = data.len(),
            duration_ms = ?duration_ms,
            "Saved audio clip"
        );

        Ok(AudioClip {
            id,
            path,
            size_bytes: data.len() as u64,
            duration_ms,
        })
    }

    async fn read_clip(&self, clip_id: Uuid) -> Result<Vec<u8>, AudioStorageError> {
        let path = self.clip_path(clip_id);
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(
                AudioStorageError::FileNotFound(path.to_string_lossy().to_string()),
            ),
            Err(e) => Err(io_error(e)),
        }
    }

    async fn release_clip(&self, clip_id: Uuid) -> Result<(), AudioStorageError> {
        match fs::remove_file(self.clip_path(clip_id)).await {
            Ok(()) => {
                tracing::debug!(clip_id = %clip_id, "Released audio clip");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(e)),
        }
    }

    async fn purge_all(&self) -> Result<u64, AudioStorageError> {
        let mut deleted_count = 0u64;
        let mut entries = fs::read_dir(&self.base_dir).await.map_err(io_error)?;

        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            if entry.path().extension().is_some_and(|ext| ext == "wav") {
                fs::remove_file(entry.path()).await.map_err(io_error)?;
                deleted_count += 1;
            }
        }

        if deleted_count > 0 {
            tracing::info!(files = deleted_count, "Purged stale audio clips");
        }
        Ok(deleted_count)
    }
}
