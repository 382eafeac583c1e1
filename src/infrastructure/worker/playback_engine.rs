//! Playback Engine - 每个 Guild 一个串行播放 worker
//!
//! 不同 Guild 的 worker 相互独立，互不阻塞

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::guild_worker::{GuildMessage, GuildWorker};
use crate::application::ports::{
    AudioPlayerPort, AudioStoragePort, GuildConnection, MediaSenderPort, PlaybackControlPort,
    PlaybackError, PlaybackStatus, SettingsCachePort, SynthesisEnginePort,
};
use crate::application::VoiceProfileResolver;
use crate::domain::playback::{GuildPlayback, PlaybackItem};
use crate::domain::{ChannelId, GuildId, TextRules};

/// Engine 配置
#[derive(Debug, Clone)]
pub struct PlaybackEngineConfig {
    pub rules: TextRules,
    /// 整个两步合成的调用方超时
    pub pipeline_timeout: Duration,
    /// 播放 watchdog 在音频时长之外额外等待的时间
    pub completion_grace: Duration,
}

impl Default for PlaybackEngineConfig {
    fn default() -> Self {
        Self {
            rules: TextRules::default(),
            pipeline_timeout: Duration::from_secs(60),
            completion_grace: Duration::from_secs(15),
        }
    }
}

/// worker 依赖的端口
#[derive(Clone)]
pub struct PlaybackDeps {
    pub synthesizer: Arc<dyn SynthesisEnginePort>,
    pub settings: Arc<dyn SettingsCachePort>,
    pub profiles: VoiceProfileResolver,
    pub storage: Arc<dyn AudioStoragePort>,
    pub player: Arc<dyn AudioPlayerPort>,
    pub media: Arc<dyn MediaSenderPort>,
}

struct GuildHandle {
    connection: GuildConnection,
    sender: mpsc::UnboundedSender<GuildMessage>,
    task: JoinHandle<()>,
}

/// 播放引擎
pub struct PlaybackEngine {
    deps: PlaybackDeps,
    config: Arc<PlaybackEngineConfig>,
    guilds: DashMap<GuildId, GuildHandle>,
}

impl PlaybackEngine {
    pub fn new(deps: PlaybackDeps, config: PlaybackEngineConfig) -> Self {
        Self {
            deps,
            config: Arc::new(config),
            guilds: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn active_guilds(&self) -> usize {
        self.guilds.len()
    }

    /// 停止所有 worker 并等待退出
    pub async fn shutdown(&self) {
        let guild_ids: Vec<GuildId> = self.guilds.iter().map(|e| *e.key()).collect();
        for guild_id in guild_ids {
            if let Some((_, handle)) = self.guilds.remove(&guild_id) {
                let _ = handle.sender.send(GuildMessage::Shutdown);
                if let Err(e) = handle.task.await {
                    tracing::warn!(
                        guild_id = %guild_id,
                        error = %e,
                        "Guild worker ended abnormally"
                    );
                }
            }
        }
        tracing::info!("Playback engine stopped");
    }

    fn sender(
        &self,
        guild_id: GuildId,
    ) -> Result<mpsc::UnboundedSender<GuildMessage>, PlaybackError> {
        self.guilds
            .get(&guild_id)
            .map(|h| h.sender.clone())
            .ok_or(PlaybackError::NoActiveConnection(guild_id))
    }

    async fn request<T>(
        &self,
        guild_id: GuildId,
        build: impl FnOnce(oneshot::Sender<T>) -> GuildMessage,
    ) -> Result<T, PlaybackError> {
        let sender = self.sender(guild_id)?;
        let (tx, rx) = oneshot::channel();
        sender
            .send(build(tx))
            .map_err(|_| PlaybackError::EngineStopped(guild_id))?;
        rx.await.map_err(|_| PlaybackError::EngineStopped(guild_id))
    }
}

#[async_trait]
impl PlaybackControlPort for PlaybackEngine {
    async fn open(
        &self,
        guild_id: GuildId,
        output_channel: ChannelId,
        notify_channel: ChannelId,
    ) -> GuildConnection {
        if let Some((_, previous)) = self.guilds.remove(&guild_id) {
            tracing::info!(guild_id = %guild_id, "Replacing existing playback state");
            let _ = previous.sender.send(GuildMessage::Shutdown);
        }

        let playback = GuildPlayback::new(guild_id, output_channel, notify_channel);
        let connection = GuildConnection {
            guild_id,
            output_channel,
            notify_channel,
            connected_at: playback.connected_at(),
        };

        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = GuildWorker::new(
            playback,
            self.deps.clone(),
            self.config.clone(),
            sender.downgrade(),
            receiver,
        );
        let task = tokio::spawn(worker.run());

        self.guilds.insert(
            guild_id,
            GuildHandle {
                connection: connection.clone(),
                sender,
                task,
            },
        );
        connection
    }

    async fn close(&self, guild_id: GuildId) -> Option<GuildConnection> {
        let (_, handle) = self.guilds.remove(&guild_id)?;
        let _ = handle.sender.send(GuildMessage::Shutdown);
        Some(handle.connection)
    }

    fn connection(&self, guild_id: GuildId) -> Option<GuildConnection> {
        self.guilds.get(&guild_id).map(|h| h.connection.clone())
    }

    async fn enqueue(&self, guild_id: GuildId, item: PlaybackItem) -> Result<(), PlaybackError> {
        self.sender(guild_id)?
            .send(GuildMessage::Enqueue(item))
            .map_err(|_| PlaybackError::EngineStopped(guild_id))
    }

    async fn skip(&self, guild_id: GuildId) -> Result<bool, PlaybackError> {
        self.request(guild_id, GuildMessage::Skip).await
    }

    async fn status(&self, guild_id: GuildId) -> Result<PlaybackStatus, PlaybackError> {
        self.request(guild_id, GuildMessage::Status).await
    }
}
