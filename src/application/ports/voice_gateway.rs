//! Voice Gateway Port - 聊天平台语音连接
//!
//! 加入 / 离开语音频道、发送文字通知、发送媒体，均由外部网关进程执行

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ChannelId, GuildId};

/// 网关错误
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Gateway not connected")]
    NotConnected,

    #[error("Gateway request failed: {0}")]
    RequestFailed(String),
}

/// Voice Gateway Port
#[async_trait]
pub trait VoiceGatewayPort: Send + Sync {
    /// 加入语音频道
    async fn join(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<(), GatewayError>;

    /// 离开语音频道
    async fn leave(&self, guild_id: GuildId) -> Result<(), GatewayError>;
}

/// 文字通知
#[async_trait]
pub trait NotifierPort: Send + Sync {
    async fn notify(&self, channel_id: ChannelId, message: &str) -> Result<(), GatewayError>;
}

/// 媒体发送，返回即视为完成
#[async_trait]
pub trait MediaSenderPort: Send + Sync {
    async fn send_media(&self, channel_id: ChannelId, url: &str) -> Result<(), GatewayError>;
}
