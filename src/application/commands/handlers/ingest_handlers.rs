//! Ingest Handler - 入站消息过滤与入队

use serde::Serialize;
use std::sync::Arc;

use crate::application::commands::{Attachment, IngestMessage};
use crate::application::error::ApplicationError;
use crate::application::ports::{PlaybackControlPort, PlaybackError};
use crate::domain::playback::PlaybackItem;
use crate::domain::{check_readable, RejectReason};

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

fn is_image(attachment: &Attachment) -> bool {
    let name = attachment.filename.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// 消息未被朗读的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestSkip {
    SelfMessage,
    NotConnected,
    WrongChannel,
    ContainsUrl,
    LargeNumber,
    Empty,
}

impl From<RejectReason> for IngestSkip {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::ContainsUrl => IngestSkip::ContainsUrl,
            RejectReason::LargeNumber => IngestSkip::LargeNumber,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestResponse {
    pub enqueued: usize,
    pub skipped: Option<IngestSkip>,
}

impl IngestResponse {
    fn skipped(reason: IngestSkip) -> Self {
        Self {
            enqueued: 0,
            skipped: Some(reason),
        }
    }
}

/// IngestMessage Handler
pub struct IngestMessageHandler {
    playback: Arc<dyn PlaybackControlPort>,
}

impl IngestMessageHandler {
    pub fn new(playback: Arc<dyn PlaybackControlPort>) -> Self {
        Self { playback }
    }

    /// 过滤在替换之前、针对原始内容进行；图片附件先于文本入队
    pub async fn handle(&self, msg: IngestMessage) -> Result<IngestResponse, ApplicationError> {
        if msg.author_is_self {
            return Ok(IngestResponse::skipped(IngestSkip::SelfMessage));
        }

        let Some(connection) = self.playback.connection(msg.guild_id) else {
            return Ok(IngestResponse::skipped(IngestSkip::NotConnected));
        };
        if msg.channel_id != connection.notify_channel {
            return Ok(IngestResponse::skipped(IngestSkip::WrongChannel));
        }

        if let Err(reason) = check_readable(&msg.content) {
            tracing::debug!(
                guild_id = %msg.guild_id,
                author_id = %msg.author_id,
                reason = reason.as_str(),
                "Message rejected"
            );
            return Ok(IngestResponse::skipped(reason.into()));
        }

        let mut items: Vec<PlaybackItem> = msg
            .attachments
            .iter()
            .filter(|a| is_image(a))
            .map(|a| PlaybackItem::media(a.url.clone()))
            .collect();
        if !msg.content.trim().is_empty() {
            items.push(PlaybackItem::text(msg.author_id, msg.content));
        }

        if items.is_empty() {
            return Ok(IngestResponse::skipped(IngestSkip::Empty));
        }

        let count = items.len();
        for item in items {
            match self.playback.enqueue(msg.guild_id, item).await {
                Ok(()) => {}
                Err(PlaybackError::NoActiveConnection(_)) => {
                    return Ok(IngestResponse::skipped(IngestSkip::NotConnected));
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(IngestResponse {
            enqueued: count,
            skipped: None,
        })
    }
}
