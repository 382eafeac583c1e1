//! Configuration Loader
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml / config.local.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// # 环境变量示例
/// - `YOMIAGE_SERVER__PORT=8080`
/// - `YOMIAGE_VOICEVOX__URL=http://voicevox:50021`
/// - `YOMIAGE_PLAYBACK__ANNOUNCE_JOINS=false`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置，None 时搜索默认文件名
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 话者目录没有标量默认值，缺省时由 serde 补上
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5080)?
        .set_default("voicevox.url", "http://localhost:50021")?
        .set_default("voicevox.timeout_secs", 30)?
        .set_default("voicevox.pipeline_timeout_secs", 60)?
        .set_default("voicevox.default_speaker_id", 3)?
        .set_default("playback.max_chars", 500)?
        .set_default("playback.truncate_keep_chars", 10)?
        .set_default("playback.omission_marker", "以下略")?
        .set_default("playback.completion_grace_secs", 15)?
        .set_default("playback.announce_joins", true)?
        .set_default("database.path", "data/yomiage.db")?
        .set_default("database.max_connections", 5)?
        .set_default("storage.audio_dir", "data/audio")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 前缀 YOMIAGE_，层级分隔符 __
    builder = builder.add_source(
        Environment::with_prefix("YOMIAGE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(invalid("Server port cannot be 0"));
    }

    if config.voicevox.url.trim().is_empty() {
        return Err(invalid("VOICEVOX URL cannot be empty"));
    }

    if config.voicevox.pipeline_timeout_secs == 0 {
        return Err(invalid("Pipeline timeout cannot be 0"));
    }

    if config.database.path.is_empty() {
        return Err(invalid("Database path cannot be empty"));
    }

    if config.speakers.is_empty() {
        return Err(invalid("Speaker catalog cannot be empty"));
    }

    if let Some((name, _)) = config.speakers.iter().find(|(_, styles)| styles.is_empty()) {
        return Err(invalid(format!("Speaker {} has no styles", name)));
    }

    let default_id = config.voicevox.default_speaker_id;
    let listed = config
        .speakers
        .values()
        .any(|styles| styles.values().any(|id| *id == default_id));
    if !listed && !config.voicevox.allow_unlisted_default {
        return Err(invalid(format!(
            "Default speaker id {} is not in the speaker catalog",
            default_id
        )));
    }

    if config.playback.truncate_keep_chars > config.playback.max_chars {
        return Err(invalid("truncate_keep_chars cannot exceed max_chars"));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Public Base URL: {}", config.server.public_base_url());
    tracing::info!("VOICEVOX URL: {}", config.voicevox.url);
    tracing::info!(
        "VOICEVOX Timeout: {}s per request, {}s per item",
        config.voicevox.timeout_secs,
        config.voicevox.pipeline_timeout_secs
    );
    tracing::info!("Default Speaker ID: {}", config.voicevox.default_speaker_id);
    tracing::info!(
        "Speakers: {}",
        config.speakers.keys().cloned().collect::<Vec<_>>().join(", ")
    );
    tracing::info!(
        "Truncate: >{} chars -> {} chars + {}",
        config.playback.max_chars,
        config.playback.truncate_keep_chars,
        config.playback.omission_marker
    );
    tracing::info!("Announce Joins: {}", config.playback.announce_joins);
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Audio Directory: {:?}", config.storage.audio_dir);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
