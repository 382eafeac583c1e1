//! Playback Control Port - 播放引擎的入站接口
//!
//! 命令处理器只通过此接口操作每个 Guild 的播放状态

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::playback::{PlaybackItem, PlayingPhase, Ticket};
use crate::domain::{ChannelId, GuildId};

/// 播放错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("No active voice connection for guild {0}")]
    NoActiveConnection(GuildId),

    #[error("Playback worker for guild {0} has stopped")]
    EngineStopped(GuildId),
}

/// Guild 的连接信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuildConnection {
    pub guild_id: GuildId,
    pub output_channel: ChannelId,
    pub notify_channel: ChannelId,
    pub connected_at: DateTime<Utc>,
}

/// 播放状态快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackStatus {
    pub guild_id: GuildId,
    pub output_channel: ChannelId,
    pub notify_channel: ChannelId,
    pub playing: bool,
    pub phase: Option<PlayingPhase>,
    pub ticket: Option<Ticket>,
    pub queue_len: usize,
    pub connected_at: DateTime<Utc>,
}

/// Playback Control Port
#[async_trait]
pub trait PlaybackControlPort: Send + Sync {
    /// 建立 Guild 的播放状态；已存在时丢弃旧状态重新建立
    async fn open(
        &self,
        guild_id: GuildId,
        output_channel: ChannelId,
        notify_channel: ChannelId,
    ) -> GuildConnection;

    /// 丢弃 Guild 的播放状态，返回被关闭的连接
    async fn close(&self, guild_id: GuildId) -> Option<GuildConnection>;

    /// 当前连接
    fn connection(&self, guild_id: GuildId) -> Option<GuildConnection>;

    /// 入队，不等待任何进行中的合成
    async fn enqueue(&self, guild_id: GuildId, item: PlaybackItem) -> Result<(), PlaybackError>;

    /// 中断当前条目，保留队列；返回是否有条目被中断
    async fn skip(&self, guild_id: GuildId) -> Result<bool, PlaybackError>;

    /// 状态快照
    async fn status(&self, guild_id: GuildId) -> Result<PlaybackStatus, PlaybackError>;
}
