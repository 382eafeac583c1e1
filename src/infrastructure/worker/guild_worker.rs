//! Guild Worker - 单个 Guild 的播放 actor
//!
//! 每个 Guild 一个 tokio task，独占 [`GuildPlayback`]。入队、合成结果、
//! 播放完成、skip 都作为消息进入同一个 mailbox 串行处理，
//! 所以 "是否正在播放" 的判断和出队对并发的入队与完成回调是原子的。

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::playback_engine::{PlaybackDeps, PlaybackEngineConfig};
use crate::application::ports::{
    AudioClip, AudioStorageError, GatewayError, PlaybackCompletion, PlaybackOutcome,
    PlaybackStatus, SynthesisError,
};
use crate::domain::playback::{GuildPlayback, PlaybackItem, PlaybackState, PlayingPhase, Ticket};
use crate::domain::{text_filter, GuildId, UserId};

/// 单个条目的失败原因（只记录日志，不影响后续条目）
#[derive(Debug, Error)]
pub enum ItemError {
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error("Synthesis timed out after {0:?}")]
    TimedOut(Duration),

    #[error(transparent)]
    Storage(#[from] AudioStorageError),
}

pub(super) enum GuildMessage {
    Enqueue(PlaybackItem),
    Synthesized {
        ticket: Ticket,
        result: Result<AudioClip, ItemError>,
    },
    MediaSent {
        ticket: Ticket,
        result: Result<(), GatewayError>,
    },
    Completed {
        ticket: Ticket,
        outcome: PlaybackOutcome,
    },
    WatchdogFired {
        ticket: Ticket,
    },
    Skip(oneshot::Sender<bool>),
    Status(oneshot::Sender<PlaybackStatus>),
    Shutdown,
}

/// 当前条目的附属资源
struct InFlight {
    ticket: Ticket,
    clip: Option<AudioClip>,
    watchdog: Option<JoinHandle<()>>,
}

impl InFlight {
    fn new(ticket: Ticket) -> Self {
        Self {
            ticket,
            clip: None,
            watchdog: None,
        }
    }

    /// 合成/发送任务不中止，晚到的结果按过期 ticket 处理
    fn detach(&mut self) {
        if let Some(watchdog) = self.watchdog.take() {
            watchdog.abort();
        }
    }
}

pub(super) struct GuildWorker {
    playback: GuildPlayback,
    deps: PlaybackDeps,
    config: Arc<PlaybackEngineConfig>,
    /// 弱引用：回调与子任务不应让 worker 在 engine 释放后继续存活
    mailbox: mpsc::WeakUnboundedSender<GuildMessage>,
    receiver: mpsc::UnboundedReceiver<GuildMessage>,
    in_flight: Option<InFlight>,
}

impl GuildWorker {
    pub(super) fn new(
        playback: GuildPlayback,
        deps: PlaybackDeps,
        config: Arc<PlaybackEngineConfig>,
        mailbox: mpsc::WeakUnboundedSender<GuildMessage>,
        receiver: mpsc::UnboundedReceiver<GuildMessage>,
    ) -> Self {
        Self {
            playback,
            deps,
            config,
            mailbox,
            receiver,
            in_flight: None,
        }
    }

    fn guild_id(&self) -> GuildId {
        self.playback.guild_id()
    }

    pub(super) async fn run(mut self) {
        tracing::info!(
            guild_id = %self.guild_id(),
            output_channel = %self.playback.output_channel(),
            "Guild playback worker started"
        );

        while let Some(message) = self.receiver.recv().await {
            match message {
                GuildMessage::Enqueue(item) => {
                    tracing::debug!(
                        guild_id = %self.guild_id(),
                        kind = item.kind(),
                        queue_len = self.playback.queue_len() + 1,
                        "Item enqueued"
                    );
                    if self.playback.enqueue(item) {
                        self.pump();
                    }
                }
                GuildMessage::Synthesized { ticket, result } => {
                    self.on_synthesized(ticket, result).await;
                }
                GuildMessage::MediaSent { ticket, result } => {
                    self.on_media_sent(ticket, result).await;
                }
                GuildMessage::Completed { ticket, outcome } => {
                    self.on_completed(ticket, outcome).await;
                }
                GuildMessage::WatchdogFired { ticket } => {
                    self.on_watchdog(ticket).await;
                }
                GuildMessage::Skip(reply) => {
                    let skipped = self.skip().await;
                    let _ = reply.send(skipped);
                }
                GuildMessage::Status(reply) => {
                    let _ = reply.send(self.status());
                }
                GuildMessage::Shutdown => break,
            }
        }

        self.teardown().await;
        tracing::info!(guild_id = %self.guild_id(), "Guild playback worker stopped");
    }

    /// 空闲时出队一条并启动处理；正在播放时无操作
    fn pump(&mut self) {
        let Some(dispatch) = self.playback.pump() else {
            return;
        };
        let ticket = dispatch.ticket;

        match dispatch.item {
            PlaybackItem::Text { author_id, content } => {
                self.spawn_synthesis(ticket, author_id, content)
            }
            PlaybackItem::Media { url } => self.spawn_media(ticket, url),
        }
        self.in_flight = Some(InFlight::new(ticket));

        tracing::debug!(
            guild_id = %self.guild_id(),
            ticket = %ticket,
            remaining = self.playback.queue_len(),
            "Item dispatched"
        );
    }

    fn spawn_synthesis(&self, ticket: Ticket, author_id: UserId, content: String) {
        let deps = self.deps.clone();
        let config = self.config.clone();
        let mailbox = self.mailbox.clone();
        let guild_id = self.guild_id();

        tokio::spawn(async move {
            let result = synthesize_item(&deps, &config, guild_id, author_id, &content).await;
            let message = GuildMessage::Synthesized { ticket, result };
            let undelivered = match mailbox.upgrade() {
                Some(tx) => tx.send(message).err().map(|e| e.0),
                None => Some(message),
            };
            // worker 已退出，由任务自己释放音频
            if let Some(GuildMessage::Synthesized { result: Ok(clip), .. }) = undelivered {
                if let Err(e) = deps.storage.release_clip(clip.id).await {
                    tracing::warn!(clip_id = %clip.id, error = %e, "Failed to release audio clip");
                }
            }
        });
    }

    fn spawn_media(&self, ticket: Ticket, url: String) {
        let media = self.deps.media.clone();
        let mailbox = self.mailbox.clone();
        let channel = self.playback.notify_channel();

        tokio::spawn(async move {
            let result = media.send_media(channel, &url).await;
            if let Some(tx) = mailbox.upgrade() {
                let _ = tx.send(GuildMessage::MediaSent { ticket, result });
            }
        });
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        self.in_flight.as_ref().map(|f| f.ticket) == Some(ticket)
    }

    async fn on_synthesized(&mut self, ticket: Ticket, result: Result<AudioClip, ItemError>) {
        if !self.is_current(ticket) {
            tracing::debug!(
                guild_id = %self.guild_id(),
                ticket = %ticket,
                "Dropping stale synthesis result"
            );
            if let Ok(clip) = result {
                self.release(&clip).await;
            }
            return;
        }

        let clip = match result {
            Ok(clip) => clip,
            Err(e) => {
                let step = match &e {
                    ItemError::Synthesis(s) => s.step.as_str(),
                    ItemError::TimedOut(_) => "timeout",
                    ItemError::Storage(_) => "storage",
                };
                tracing::warn!(
                    guild_id = %self.guild_id(),
                    ticket = %ticket,
                    step = step,
                    error = %e,
                    "Synthesis failed, skipping item"
                );
                self.finish(ticket).await;
                return;
            }
        };

        self.playback.mark_speaking(ticket);
        let completion = self.completion_for(ticket);

        match self.deps.player.play(self.guild_id(), &clip, completion).await {
            Ok(()) => {
                let watchdog = self.spawn_watchdog(ticket, &clip);
                tracing::debug!(
                    guild_id = %self.guild_id(),
                    ticket = %ticket,
                    clip_id = %clip.id,
                    duration_ms = ?clip.duration_ms,
                    "Playback started"
                );
                if let Some(in_flight) = self.in_flight.as_mut() {
                    in_flight.clip = Some(clip);
                    in_flight.watchdog = Some(watchdog);
                }
            }
            Err(e) => {
                tracing::warn!(
                    guild_id = %self.guild_id(),
                    ticket = %ticket,
                    error = %e,
                    "Player rejected clip, skipping item"
                );
                self.release(&clip).await;
                self.finish(ticket).await;
            }
        }
    }

    async fn on_media_sent(&mut self, ticket: Ticket, result: Result<(), GatewayError>) {
        if !self.is_current(ticket) {
            return;
        }
        if let Err(e) = result {
            tracing::warn!(
                guild_id = %self.guild_id(),
                ticket = %ticket,
                error = %e,
                "Failed to send media"
            );
        }
        self.finish(ticket).await;
    }

    async fn on_completed(&mut self, ticket: Ticket, outcome: PlaybackOutcome) {
        if !self.is_current(ticket) {
            tracing::debug!(
                guild_id = %self.guild_id(),
                ticket = %ticket,
                outcome = outcome.as_str(),
                "Ignoring stale completion"
            );
            return;
        }

        match &outcome {
            PlaybackOutcome::Failed(error) => {
                tracing::warn!(
                    guild_id = %self.guild_id(),
                    ticket = %ticket,
                    error = %error,
                    "Playback failed"
                );
            }
            _ => {
                tracing::debug!(
                    guild_id = %self.guild_id(),
                    ticket = %ticket,
                    outcome = outcome.as_str(),
                    "Playback completed"
                );
            }
        }
        self.finish(ticket).await;
    }

    async fn on_watchdog(&mut self, ticket: Ticket) {
        if self.playback.speaking_ticket() != Some(ticket) {
            return;
        }
        tracing::warn!(
            guild_id = %self.guild_id(),
            ticket = %ticket,
            "No completion received in time, advancing queue"
        );
        if let Err(e) = self.deps.player.stop(self.guild_id()).await {
            tracing::debug!(guild_id = %self.guild_id(), error = %e, "Stop after watchdog failed");
        }
        self.finish(ticket).await;
    }

    /// 中断当前条目，队列保持不变
    async fn skip(&mut self) -> bool {
        let PlaybackState::Playing { ticket, phase } = self.playback.state() else {
            return false;
        };

        match phase {
            PlayingPhase::Speaking => {
                // 正常路径：stop 触发完成回调，再由 Completed 推进队列
                if let Err(e) = self.deps.player.stop(self.guild_id()).await {
                    tracing::warn!(
                        guild_id = %self.guild_id(),
                        error = %e,
                        "Failed to stop player"
                    );
                    self.finish(ticket).await;
                }
                true
            }
            PlayingPhase::Synthesizing => {
                self.finish(ticket).await;
                true
            }
            PlayingPhase::SendingMedia => false,
        }
    }

    /// 结束当前条目：释放资源、回到 Idle、继续 pump
    async fn finish(&mut self, ticket: Ticket) {
        if !self.playback.finish(ticket) {
            return;
        }
        if let Some(mut in_flight) = self.in_flight.take() {
            in_flight.detach();
            if let Some(clip) = in_flight.clip.take() {
                self.release(&clip).await;
            }
        }
        self.pump();
    }

    fn completion_for(&self, ticket: Ticket) -> PlaybackCompletion {
        let mailbox = self.mailbox.clone();
        PlaybackCompletion::new(move |outcome| {
            if let Some(tx) = mailbox.upgrade() {
                let _ = tx.send(GuildMessage::Completed { ticket, outcome });
            }
        })
    }

    fn spawn_watchdog(&self, ticket: Ticket, clip: &AudioClip) -> JoinHandle<()> {
        let deadline =
            Duration::from_millis(clip.duration_ms.unwrap_or(0)) + self.config.completion_grace;
        let mailbox = self.mailbox.clone();
        tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            if let Some(tx) = mailbox.upgrade() {
                let _ = tx.send(GuildMessage::WatchdogFired { ticket });
            }
        })
    }

    async fn release(&self, clip: &AudioClip) {
        if let Err(e) = self.deps.storage.release_clip(clip.id).await {
            tracing::warn!(clip_id = %clip.id, error = %e, "Failed to release audio clip");
        }
    }

    fn status(&self) -> PlaybackStatus {
        let (ticket, phase) = match self.playback.state() {
            PlaybackState::Idle => (None, None),
            PlaybackState::Playing { ticket, phase } => (Some(ticket), Some(phase)),
        };
        PlaybackStatus {
            guild_id: self.guild_id(),
            output_channel: self.playback.output_channel(),
            notify_channel: self.playback.notify_channel(),
            playing: self.playback.is_playing(),
            phase,
            ticket,
            queue_len: self.playback.queue_len(),
            connected_at: self.playback.connected_at(),
        }
    }

    async fn teardown(&mut self) {
        if let Some(mut in_flight) = self.in_flight.take() {
            in_flight.detach();
            if let Some(clip) = in_flight.clip.take() {
                self.release(&clip).await;
            }
        }
        let dropped = self.playback.queue_len();
        if dropped > 0 {
            tracing::info!(
                guild_id = %self.guild_id(),
                dropped = dropped,
                "Discarding queued items"
            );
        }

        // 关闭后仍在运行的合成任务投递失败，会自行释放音频
        self.receiver.close();
        while let Ok(message) = self.receiver.try_recv() {
            if let GuildMessage::Synthesized { result: Ok(clip), .. } = message {
                self.release(&clip).await;
            }
        }
    }
}

/// 辞书替换 -> 解析用户配置 -> 合成（带超时）-> 落盘
async fn synthesize_item(
    deps: &PlaybackDeps,
    config: &PlaybackEngineConfig,
    guild_id: GuildId,
    author_id: UserId,
    content: &str,
) -> Result<AudioClip, ItemError> {
    let dictionary = deps.settings.dictionary(guild_id).await;
    let text = text_filter::transform(content, &dictionary, &config.rules);
    let profile = deps.profiles.resolve(author_id).await;

    let synthesis = deps.synthesizer.synthesize(&text, &profile);
    let audio = tokio::time::timeout(config.pipeline_timeout, synthesis)
        .await
        .map_err(|_| ItemError::TimedOut(config.pipeline_timeout))??;

    Ok(deps.storage.save_clip(&audio.audio_data).await?)
}
