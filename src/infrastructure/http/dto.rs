//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::domain::{ChannelId, GuildId, UserId};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 只带一条提示文本的响应
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Voice DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub guild_id: GuildId,
    /// 命令发出者当前所在的语音频道
    #[serde(default)]
    pub voice_channel_id: Option<ChannelId>,
    /// 命令发出的文字频道，之后作为通知频道
    pub text_channel_id: ChannelId,
}

#[derive(Debug, Deserialize)]
pub struct GuildRequest {
    pub guild_id: GuildId,
}

#[derive(Debug, Serialize)]
pub struct SkipResponse {
    pub skipped: bool,
    pub message: String,
}

// ============================================================================
// Dictionary DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterWordRequest {
    pub guild_id: GuildId,
    pub word: String,
    pub pronunciation: String,
    #[serde(default)]
    pub author: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterWordResponse {
    pub id: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct RemoveWordRequest {
    pub guild_id: GuildId,
    pub word: String,
}

#[derive(Debug, Serialize)]
pub struct RemoveWordResponse {
    pub removed: bool,
    pub message: String,
}

// ============================================================================
// Speaker / Voice settings DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub user_id: UserId,
}

#[derive(Debug, Deserialize)]
pub struct SetSpeakerRequest {
    pub user_id: UserId,
    pub speaker_name: String,
    #[serde(default)]
    pub style_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SetSpeakerResponse {
    pub speaker_name: String,
    pub style_name: String,
    pub style_id: u32,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SetVoiceSettingsRequest {
    pub user_id: UserId,
    pub intensity: f64,
    pub pitch: f64,
    pub speed: f64,
}
