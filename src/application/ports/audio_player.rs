//! Audio Player Port - 音频输出
//!
//! `play` 只负责开始播放；播放结束（正常结束、被 stop、出错）时
//! 通过 [`PlaybackCompletion`] 回调通知，回调可能来自任意执行上下文。

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use super::AudioClip;
use crate::domain::GuildId;

/// 播放器错误
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Player not connected for guild {0}")]
    NotConnected(GuildId),

    #[error("Player unavailable: {0}")]
    Unavailable(String),
}

/// 一次播放的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    Finished,
    /// 被 stop 中断
    Stopped,
    Failed(String),
}

impl PlaybackOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackOutcome::Finished => "finished",
            PlaybackOutcome::Stopped => "stopped",
            PlaybackOutcome::Failed(_) => "failed",
        }
    }
}

/// 播放完成回调，只能触发一次
pub struct PlaybackCompletion(Box<dyn FnOnce(PlaybackOutcome) + Send + Sync + 'static>);

impl PlaybackCompletion {
    pub fn new(f: impl FnOnce(PlaybackOutcome) + Send + Sync + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn complete(self, outcome: PlaybackOutcome) {
        (self.0)(outcome)
    }
}

impl fmt::Debug for PlaybackCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlaybackCompletion")
    }
}

/// Audio Player Port
#[async_trait]
pub trait AudioPlayerPort: Send + Sync {
    /// 开始播放
    ///
    /// 返回 Err 时回调不会被调用，由调用方自行处理失败
    async fn play(
        &self,
        guild_id: GuildId,
        clip: &AudioClip,
        on_complete: PlaybackCompletion,
    ) -> Result<(), PlayerError>;

    /// 停止当前播放，必须以 `Stopped` 触发正在等待的回调
    async fn stop(&self, guild_id: GuildId) -> Result<(), PlayerError>;
}
