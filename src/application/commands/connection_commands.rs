//! Connection Commands - 语音频道连接生命周期

use serde::Deserialize;

use crate::domain::{ChannelId, GuildId, UserId};

/// 加入语音频道，并把发出命令的文字频道作为通知频道
#[derive(Debug, Clone)]
pub struct JoinVoice {
    pub guild_id: GuildId,
    /// 命令发出者所在的语音频道，不在语音频道时为 None
    pub voice_channel: Option<ChannelId>,
    pub text_channel: ChannelId,
}

/// 离开语音频道
#[derive(Debug, Clone)]
pub struct LeaveVoice {
    pub guild_id: GuildId,
}

/// 跳过当前条目
#[derive(Debug, Clone)]
pub struct SkipPlayback {
    pub guild_id: GuildId,
}

/// 语音频道中的成员
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Member {
    pub user_id: UserId,
    #[serde(default)]
    pub display_name: String,
    /// 是否为本系统自身
    #[serde(default)]
    pub is_self: bool,
}

/// 成员语音状态变化
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceStateChange {
    pub guild_id: GuildId,
    pub member: Member,
    pub before_channel: Option<ChannelId>,
    pub after_channel: Option<ChannelId>,
    /// 变化后仍留在 before_channel 中的成员
    #[serde(default)]
    pub remaining_in_before: Vec<Member>,
}
