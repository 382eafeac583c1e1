//! Yomiage - 聊天频道的 VOICEVOX 朗读服务
//!
//! 平台连接由外部网关进程负责，通过 /ws/bridge 接入

use std::sync::Arc;
use std::time::Duration;

use yomiage::application::ports::{AudioStoragePort, SynthesisEnginePort};
use yomiage::application::VoiceProfileResolver;
use yomiage::config::{load_config, print_config, AppConfig};
use yomiage::domain::voice::SpeakerCatalog;
use yomiage::domain::TextRules;
use yomiage::infrastructure::adapters::{FileAudioStorage, VoicevoxClient, VoicevoxClientConfig};
use yomiage::infrastructure::bridge::BridgeHub;
use yomiage::infrastructure::http::{AppPorts, AppState, HttpServer, ServerConfig};
use yomiage::infrastructure::memory::InMemorySettingsCache;
use yomiage::infrastructure::persistence::{
    create_pool, run_migrations, DatabaseConfig, SqliteSettingsRepository,
};
use yomiage::infrastructure::worker::{PlaybackDeps, PlaybackEngine, PlaybackEngineConfig};

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},yomiage={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 优先级：环境变量 > 配置文件 > 默认值
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Yomiage - VOICEVOX 読み上げサービス");
    print_config(&config);

    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 数据库
    let db_config = DatabaseConfig::new(&config.database.path, config.database.max_connections);
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    let store = Arc::new(SqliteSettingsRepository::new(pool));
    let settings = InMemorySettingsCache::new(store).arc();

    // 合成音频临时目录，清理上次运行残留的文件
    let storage = Arc::new(FileAudioStorage::new(&config.storage.audio_dir).await?);
    storage.purge_all().await?;

    // VOICEVOX
    let voicevox = Arc::new(VoicevoxClient::new(
        VoicevoxClientConfig::new(&config.voicevox.url).with_timeout(config.voicevox.timeout_secs),
    )?);
    if !voicevox.health_check().await {
        tracing::warn!(url = %config.voicevox.url, "VOICEVOX engine is not reachable yet");
    }

    let catalog = Arc::new(SpeakerCatalog::new(
        config.speakers.clone(),
        config.voicevox.default_speaker_id,
    ));
    let profiles = VoiceProfileResolver::new(settings.clone(), catalog.default_style());

    // 网关桥接
    let bridge = BridgeHub::new(config.server.public_base_url()).arc();

    // 播放引擎
    let engine_config = PlaybackEngineConfig {
        rules: TextRules {
            max_chars: config.playback.max_chars,
            keep_chars: config.playback.truncate_keep_chars,
            omission_marker: config.playback.omission_marker.clone(),
        },
        pipeline_timeout: config.voicevox.pipeline_timeout(),
        completion_grace: Duration::from_secs(config.playback.completion_grace_secs),
    };
    let engine = PlaybackEngine::new(
        PlaybackDeps {
            synthesizer: voicevox,
            settings: settings.clone(),
            profiles: profiles.clone(),
            storage: storage.clone(),
            player: bridge.clone(),
            media: bridge.clone(),
        },
        engine_config,
    )
    .arc();

    let state = AppState::new(AppPorts {
        settings,
        playback: engine.clone(),
        gateway: bridge.clone(),
        notifier: bridge.clone(),
        storage: storage.clone(),
        bridge,
        catalog,
        profiles,
        announce_joins: config.playback.announce_joins,
    });

    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let server = HttpServer::new(server_config, state);

    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    engine.shutdown().await;
    let purged = storage.purge_all().await?;
    tracing::info!(purged, "Server shutdown complete");

    Ok(())
}
