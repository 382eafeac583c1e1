//! Connection Command Handlers - 语音频道生命周期

use serde::Serialize;
use std::sync::Arc;

use crate::application::commands::{JoinVoice, LeaveVoice, SkipPlayback, VoiceStateChange};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    GuildConnection, NotifierPort, PlaybackControlPort, VoiceGatewayPort,
};
use crate::domain::playback::PlaybackItem;
use crate::domain::{ChannelId, GuildId};

pub const JOINED_MESSAGE: &str = "接続しました。";
pub const LEFT_MESSAGE: &str = "ボイスチャンネルから退出しました";
pub const AUTO_LEFT_MESSAGE: &str = "ボイスチャンネルに誰もいなくなったため、退出しました。";
pub const NOT_IN_VOICE_MESSAGE: &str = "あなたは現在ボイスチャンネルに接続されていません。";
pub const SKIPPED_MESSAGE: &str = "再生中の音声をスキップしました。";
pub const NOTHING_TO_SKIP_MESSAGE: &str = "読み上げていませんので実行できません。";

/// 入室播报文本
pub fn join_announcement(display_name: &str) -> String {
    format!("{}さんが入室しました", display_name)
}

async fn notify_quietly(notifier: &dyn NotifierPort, channel: ChannelId, message: &str) {
    if let Err(e) = notifier.notify(channel, message).await {
        tracing::warn!(channel_id = %channel, error = %e, "Failed to send notice");
    }
}

// ============================================================================
// JoinVoice
// ============================================================================

#[derive(Debug, Clone)]
pub struct JoinVoiceResponse {
    pub connection: GuildConnection,
    pub message: String,
}

/// JoinVoice Handler
pub struct JoinVoiceHandler {
    gateway: Arc<dyn VoiceGatewayPort>,
    notifier: Arc<dyn NotifierPort>,
    playback: Arc<dyn PlaybackControlPort>,
}

impl JoinVoiceHandler {
    pub fn new(
        gateway: Arc<dyn VoiceGatewayPort>,
        notifier: Arc<dyn NotifierPort>,
        playback: Arc<dyn PlaybackControlPort>,
    ) -> Self {
        Self {
            gateway,
            notifier,
            playback,
        }
    }

    pub async fn handle(&self, cmd: JoinVoice) -> Result<JoinVoiceResponse, ApplicationError> {
        let voice_channel = cmd
            .voice_channel
            .ok_or_else(|| ApplicationError::validation(NOT_IN_VOICE_MESSAGE))?;

        self.gateway.join(cmd.guild_id, voice_channel).await?;
        let connection = self
            .playback
            .open(cmd.guild_id, voice_channel, cmd.text_channel)
            .await;

        tracing::info!(
            guild_id = %cmd.guild_id,
            output_channel = %voice_channel,
            notify_channel = %cmd.text_channel,
            "Joined voice channel"
        );

        notify_quietly(self.notifier.as_ref(), cmd.text_channel, JOINED_MESSAGE).await;

        Ok(JoinVoiceResponse {
            connection,
            message: JOINED_MESSAGE.to_string(),
        })
    }
}

// ============================================================================
// LeaveVoice
// ============================================================================

/// LeaveVoice Handler
pub struct LeaveVoiceHandler {
    gateway: Arc<dyn VoiceGatewayPort>,
    playback: Arc<dyn PlaybackControlPort>,
}

impl LeaveVoiceHandler {
    pub fn new(gateway: Arc<dyn VoiceGatewayPort>, playback: Arc<dyn PlaybackControlPort>) -> Self {
        Self { gateway, playback }
    }

    /// 丢弃 Guild 的播放状态，需要重新 join 才能继续朗读
    pub async fn handle(&self, cmd: LeaveVoice) -> Result<String, ApplicationError> {
        let connection = self
            .playback
            .close(cmd.guild_id)
            .await
            .ok_or(ApplicationError::NoActiveConnection(cmd.guild_id))?;

        self.gateway.leave(cmd.guild_id).await?;

        tracing::info!(
            guild_id = %cmd.guild_id,
            output_channel = %connection.output_channel,
            "Left voice channel"
        );
        Ok(LEFT_MESSAGE.to_string())
    }
}

// ============================================================================
// SkipPlayback
// ============================================================================

#[derive(Debug, Clone)]
pub struct SkipPlaybackResponse {
    pub skipped: bool,
    pub message: String,
}

/// SkipPlayback Handler
pub struct SkipPlaybackHandler {
    playback: Arc<dyn PlaybackControlPort>,
}

impl SkipPlaybackHandler {
    pub fn new(playback: Arc<dyn PlaybackControlPort>) -> Self {
        Self { playback }
    }

    pub async fn handle(
        &self,
        cmd: SkipPlayback,
    ) -> Result<SkipPlaybackResponse, ApplicationError> {
        let skipped = self.playback.skip(cmd.guild_id).await?;
        tracing::info!(guild_id = %cmd.guild_id, skipped = skipped, "Skip requested");

        let message = if skipped {
            SKIPPED_MESSAGE
        } else {
            NOTHING_TO_SKIP_MESSAGE
        };
        Ok(SkipPlaybackResponse {
            skipped,
            message: message.to_string(),
        })
    }
}

// ============================================================================
// VoiceStateChange
// ============================================================================

/// 语音状态变化的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceStateOutcome {
    Ignored,
    /// 本系统自身的加入 / 离开
    SelfEvent,
    Announced,
    AutoLeft,
}

/// VoiceStateChange Handler
pub struct VoiceStateHandler {
    gateway: Arc<dyn VoiceGatewayPort>,
    notifier: Arc<dyn NotifierPort>,
    playback: Arc<dyn PlaybackControlPort>,
    announce_joins: bool,
}

impl VoiceStateHandler {
    pub fn new(
        gateway: Arc<dyn VoiceGatewayPort>,
        notifier: Arc<dyn NotifierPort>,
        playback: Arc<dyn PlaybackControlPort>,
        announce_joins: bool,
    ) -> Self {
        Self {
            gateway,
            notifier,
            playback,
            announce_joins,
        }
    }

    pub async fn handle(
        &self,
        change: VoiceStateChange,
    ) -> Result<VoiceStateOutcome, ApplicationError> {
        let Some(connection) = self.playback.connection(change.guild_id) else {
            return Ok(VoiceStateOutcome::Ignored);
        };
        let output = Some(connection.output_channel);

        if change.member.is_self {
            self.on_self_change(&change);
            return Ok(VoiceStateOutcome::SelfEvent);
        }

        if change.after_channel == output && change.before_channel != output {
            if !self.announce_joins {
                return Ok(VoiceStateOutcome::Ignored);
            }
            let name = if change.member.display_name.is_empty() {
                change.member.user_id.to_string()
            } else {
                change.member.display_name.clone()
            };
            self.playback
                .enqueue(
                    change.guild_id,
                    PlaybackItem::text(change.member.user_id, join_announcement(&name)),
                )
                .await?;
            return Ok(VoiceStateOutcome::Announced);
        }

        if change.before_channel == output && change.after_channel != output {
            let humans_left = change.remaining_in_before.iter().any(|m| !m.is_self);
            if !humans_left {
                self.auto_leave(change.guild_id, connection.notify_channel).await;
                return Ok(VoiceStateOutcome::AutoLeft);
            }
        }

        Ok(VoiceStateOutcome::Ignored)
    }

    /// 自身加入 / 离开的扩展点，目前只记录日志
    fn on_self_change(&self, change: &VoiceStateChange) {
        tracing::debug!(
            guild_id = %change.guild_id,
            before = ?change.before_channel,
            after = ?change.after_channel,
            "Self voice state changed"
        );
    }

    async fn auto_leave(&self, guild_id: GuildId, notify_channel: ChannelId) {
        self.playback.close(guild_id).await;
        if let Err(e) = self.gateway.leave(guild_id).await {
            tracing::warn!(guild_id = %guild_id, error = %e, "Failed to leave empty channel");
        }
        tracing::info!(guild_id = %guild_id, "Output channel empty, disconnected");
        notify_quietly(self.notifier.as_ref(), notify_channel, AUTO_LEFT_MESSAGE).await;
    }
}
