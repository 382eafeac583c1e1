//! Bridge Hub - 外部网关进程的唯一出口
//!
//! 同时实现播放器、语音网关、通知、媒体发送四个端口。
//! 同一时刻只接受一个网关连接，新的连接会顶替旧的。
//! 等待中的播放回调按 Guild 保存，网关断开时全部以失败触发。

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use super::protocol::{BridgeCommand, BridgeEvent};
use crate::application::ports::{
    AudioClip, AudioPlayerPort, GatewayError, MediaSenderPort, NotifierPort, PlaybackCompletion,
    PlaybackOutcome, PlayerError, VoiceGatewayPort,
};
use crate::domain::{ChannelId, GuildId};

/// 网关断开时回调收到的错误
pub const BRIDGE_DISCONNECTED: &str = "bridge disconnected";

struct PendingPlay {
    ticket: u64,
    completion: PlaybackCompletion,
}

struct Connection {
    generation: u64,
    sender: mpsc::UnboundedSender<BridgeCommand>,
}

/// Bridge Hub
pub struct BridgeHub {
    /// 音频下载地址前缀，例如 `http://127.0.0.1:5080`
    base_url: String,
    connection: Mutex<Option<Connection>>,
    generations: AtomicU64,
    tickets: AtomicU64,
    pending: DashMap<GuildId, PendingPlay>,
}

impl BridgeHub {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            connection: Mutex::new(None),
            generations: AtomicU64::new(0),
            tickets: AtomicU64::new(0),
            pending: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// clip 的下载地址
    pub fn clip_url(&self, clip: &AudioClip) -> String {
        format!("{}/api/audio/{}", self.base_url, clip.id)
    }

    pub fn is_connected(&self) -> bool {
        self.connection
            .lock()
            .map(|c| c.as_ref().is_some_and(|c| !c.sender.is_closed()))
            .unwrap_or(false)
    }

    /// 注册新的网关连接，返回连接代号和指令接收端
    pub fn attach(&self) -> (u64, mpsc::UnboundedReceiver<BridgeCommand>) {
        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        let (sender, receiver) = mpsc::unbounded_channel();

        let replaced = match self.connection.lock() {
            Ok(mut slot) => slot.replace(Connection { generation, sender }).is_some(),
            Err(poisoned) => poisoned
                .into_inner()
                .replace(Connection { generation, sender })
                .is_some(),
        };

        if replaced {
            // 旧连接上发出的播放不会再有回应
            self.fail_all_pending();
        }
        tracing::info!(generation, replaced, "Bridge attached");
        (generation, receiver)
    }

    /// 网关断开；只有当前连接的断开才会清理
    pub fn detach(&self, generation: u64) {
        let removed = match self.connection.lock() {
            Ok(mut slot) => take_if_generation(&mut slot, generation),
            Err(poisoned) => take_if_generation(&mut poisoned.into_inner(), generation),
        };

        if removed {
            let pending = self.fail_all_pending();
            tracing::warn!(generation, pending, "Bridge detached");
        }
    }

    /// 处理网关上报的一条文本消息
    pub fn handle_message(&self, text: &str) {
        match serde_json::from_str::<BridgeEvent>(text) {
            Ok(event) => self.handle_event(event),
            Err(e) => tracing::warn!(error = %e, "Ignoring malformed bridge message"),
        }
    }

    pub fn handle_event(&self, event: BridgeEvent) {
        match event {
            BridgeEvent::PlaybackFinished {
                guild_id,
                ticket,
                error,
                stopped,
            } => {
                let outcome = match (error, stopped) {
                    (Some(e), _) => PlaybackOutcome::Failed(e),
                    (None, true) => PlaybackOutcome::Stopped,
                    (None, false) => PlaybackOutcome::Finished,
                };

                match self.pending.remove_if(&guild_id, |_, p| p.ticket == ticket) {
                    Some((_, pending)) => {
                        tracing::debug!(
                            guild_id = %guild_id,
                            ticket,
                            outcome = outcome.as_str(),
                            "Bridge playback finished"
                        );
                        pending.completion.complete(outcome);
                    }
                    None => {
                        tracing::debug!(guild_id = %guild_id, ticket, "Stale playback report");
                    }
                }
            }
        }
    }

    fn send(&self, command: BridgeCommand) -> Result<(), GatewayError> {
        let slot = self.connection.lock().map_err(|_| GatewayError::NotConnected)?;
        let connection = slot.as_ref().ok_or(GatewayError::NotConnected)?;
        connection
            .sender
            .send(command)
            .map_err(|_| GatewayError::NotConnected)
    }

    fn fail_all_pending(&self) -> usize {
        let guilds: Vec<GuildId> = self.pending.iter().map(|e| *e.key()).collect();
        let mut failed = 0;
        for guild_id in guilds {
            if let Some((_, pending)) = self.pending.remove(&guild_id) {
                pending
                    .completion
                    .complete(PlaybackOutcome::Failed(BRIDGE_DISCONNECTED.to_string()));
                failed += 1;
            }
        }
        failed
    }
}

fn take_if_generation(slot: &mut Option<Connection>, generation: u64) -> bool {
    if slot.as_ref().is_some_and(|c| c.generation == generation) {
        *slot = None;
        true
    } else {
        false
    }
}

#[async_trait]
impl AudioPlayerPort for BridgeHub {
    async fn play(
        &self,
        guild_id: GuildId,
        clip: &AudioClip,
        on_complete: PlaybackCompletion,
    ) -> Result<(), PlayerError> {
        let ticket = self.tickets.fetch_add(1, Ordering::Relaxed) + 1;

        // 先登记再发送，避免回应先于登记到达
        let previous = self.pending.insert(
            guild_id,
            PendingPlay {
                ticket,
                completion: on_complete,
            },
        );
        if let Some(previous) = previous {
            previous
                .completion
                .complete(PlaybackOutcome::Failed("superseded".to_string()));
        }

        let command = BridgeCommand::Play {
            guild_id,
            ticket,
            url: self.clip_url(clip),
            duration_ms: clip.duration_ms,
        };

        if let Err(e) = self.send(command) {
            // 失败时回调不触发，直接丢弃
            self.pending.remove_if(&guild_id, |_, p| p.ticket == ticket);
            tracing::debug!(guild_id = %guild_id, error = %e, "Play not delivered");
            return Err(PlayerError::NotConnected(guild_id));
        }

        Ok(())
    }

    async fn stop(&self, guild_id: GuildId) -> Result<(), PlayerError> {
        let pending = self.pending.remove(&guild_id);
        let sent = self.send(BridgeCommand::Stop { guild_id });

        match pending {
            Some((_, pending)) => {
                pending.completion.complete(PlaybackOutcome::Stopped);
                Ok(())
            }
            None => sent.map_err(|_| PlayerError::NotConnected(guild_id)),
        }
    }
}

#[async_trait]
impl VoiceGatewayPort for BridgeHub {
    async fn join(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<(), GatewayError> {
        self.send(BridgeCommand::Join {
            guild_id,
            channel_id,
        })
    }

    async fn leave(&self, guild_id: GuildId) -> Result<(), GatewayError> {
        if let Some((_, pending)) = self.pending.remove(&guild_id) {
            pending.completion.complete(PlaybackOutcome::Stopped);
        }
        self.send(BridgeCommand::Leave { guild_id })
    }
}

#[async_trait]
impl NotifierPort for BridgeHub {
    async fn notify(&self, channel_id: ChannelId, message: &str) -> Result<(), GatewayError> {
        self.send(BridgeCommand::Notify {
            channel_id,
            content: message.to_string(),
        })
    }
}

#[async_trait]
impl MediaSenderPort for BridgeHub {
    async fn send_media(&self, channel_id: ChannelId, url: &str) -> Result<(), GatewayError> {
        self.send(BridgeCommand::SendMedia {
            channel_id,
            url: url.to_string(),
        })
    }
}
