//! Playback Context - Value Objects

use serde::{Deserialize, Serialize};

use crate::domain::UserId;

/// 待播放条目
///
/// 入队后不可变，文本与媒体按提交顺序交错播放
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlaybackItem {
    Text { author_id: UserId, content: String },
    Media { url: String },
}

impl PlaybackItem {
    pub fn text(author_id: UserId, content: impl Into<String>) -> Self {
        Self::Text {
            author_id,
            content: content.into(),
        }
    }

    pub fn media(url: impl Into<String>) -> Self {
        Self::Media { url: url.into() }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PlaybackItem::Text { .. } => "text",
            PlaybackItem::Media { .. } => "media",
        }
    }
}

/// 一次播放的凭证，每个出队条目一个
///
/// 完成回调必须携带凭证，过期凭证的回调会被忽略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket(u64);

impl Ticket {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Playing 状态下的子阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayingPhase {
    /// 正在合成语音
    Synthesizing,
    /// 播放器正在播放
    Speaking,
    /// 正在发送媒体
    SendingMedia,
}

/// Guild 播放状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing { ticket: Ticket, phase: PlayingPhase },
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Playing { .. } => "playing",
        }
    }
}
