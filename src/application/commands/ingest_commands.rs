//! Ingest Commands - 入站消息

use serde::Deserialize;

use crate::domain::{ChannelId, GuildId, UserId};

/// 消息附件
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub url: String,
}

/// 文字频道中的新消息
#[derive(Debug, Clone, Deserialize)]
pub struct IngestMessage {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub author_id: UserId,
    /// 是否为本系统自身发出的消息
    #[serde(default)]
    pub author_is_self: bool,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}
