//! Bridge 协议 - 与外部网关进程交换的 JSON 消息

use serde::{Deserialize, Serialize};

use crate::domain::{ChannelId, GuildId};

/// 推送给网关的指令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeCommand {
    Join {
        guild_id: GuildId,
        channel_id: ChannelId,
    },
    Leave {
        guild_id: GuildId,
    },
    /// 下载 url 指向的 WAV 并在该 Guild 的语音连接上播放
    Play {
        guild_id: GuildId,
        ticket: u64,
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },
    Stop {
        guild_id: GuildId,
    },
    Notify {
        channel_id: ChannelId,
        content: String,
    },
    SendMedia {
        channel_id: ChannelId,
        url: String,
    },
}

/// 网关上报的事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeEvent {
    PlaybackFinished {
        guild_id: GuildId,
        ticket: u64,
        #[serde(default)]
        error: Option<String>,
        #[serde(default)]
        stopped: bool,
    },
}
