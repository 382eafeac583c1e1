//! Playback Queries

use crate::domain::GuildId;

/// 获取 Guild 的播放状态
#[derive(Debug, Clone)]
pub struct GetPlaybackStatus {
    pub guild_id: GuildId,
}
