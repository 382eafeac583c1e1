//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// 话者名 -> 风格名 -> 风格 ID
pub type SpeakerTable = BTreeMap<String, BTreeMap<String, u32>>;

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// VOICEVOX 引擎配置
    #[serde(default)]
    pub voicevox: VoicevoxConfig,

    /// 话者目录，进程生命周期内不变
    #[serde(default = "default_speakers")]
    pub speakers: SpeakerTable,

    /// 朗读规则
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            voicevox: VoicevoxConfig::default(),
            speakers: default_speakers(),
            playback: PlaybackConfig::default(),
            database: DatabaseConfig::default(),
            storage: StorageConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 网关下载合成音频时使用的 Base URL
    /// 如果未设置，则使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 获取公开的 Base URL
    pub fn public_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            let host = if self.host == "0.0.0.0" {
                "localhost"
            } else {
                &self.host
            };
            format!("http://{}:{}", host, self.port)
        })
    }
}

/// VOICEVOX 引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct VoicevoxConfig {
    /// 引擎基础 URL
    #[serde(default = "default_voicevox_url")]
    pub url: String,

    /// 单次 HTTP 请求超时（秒）
    #[serde(default = "default_voicevox_timeout")]
    pub timeout_secs: u64,

    /// 两步合成整体的超时（秒）
    #[serde(default = "default_pipeline_timeout")]
    pub pipeline_timeout_secs: u64,

    /// 未设置话者的用户使用的风格 ID
    #[serde(default = "default_speaker_id")]
    pub default_speaker_id: u32,

    /// 允许 default_speaker_id 不在话者目录中
    #[serde(default)]
    pub allow_unlisted_default: bool,
}

fn default_voicevox_url() -> String {
    "http://localhost:50021".to_string()
}

fn default_voicevox_timeout() -> u64 {
    30
}

fn default_pipeline_timeout() -> u64 {
    60
}

fn default_speaker_id() -> u32 {
    3 // ずんだもん ノーマル
}

impl Default for VoicevoxConfig {
    fn default() -> Self {
        Self {
            url: default_voicevox_url(),
            timeout_secs: default_voicevox_timeout(),
            pipeline_timeout_secs: default_pipeline_timeout(),
            default_speaker_id: default_speaker_id(),
            allow_unlisted_default: false,
        }
    }
}

impl VoicevoxConfig {
    pub fn pipeline_timeout(&self) -> Duration {
        Duration::from_secs(self.pipeline_timeout_secs)
    }
}

/// 默认话者目录（VOICEVOX 的风格 ID）
pub fn default_speakers() -> SpeakerTable {
    fn styles(entries: &[(&str, u32)]) -> BTreeMap<String, u32> {
        entries
            .iter()
            .map(|(name, id)| (name.to_string(), *id))
            .collect()
    }

    let mut speakers = BTreeMap::new();
    speakers.insert(
        "四国めたん".to_string(),
        styles(&[
            ("ノーマル", 2),
            ("あまあま", 0),
            ("ツンツン", 6),
            ("セクシー", 4),
            ("ささやき", 36),
            ("ヒソヒソ", 37),
        ]),
    );
    speakers.insert(
        "ずんだもん".to_string(),
        styles(&[
            ("ノーマル", 3),
            ("あまあま", 1),
            ("ツンツン", 7),
            ("セクシー", 5),
            ("ささやき", 22),
            ("ヒソヒソ", 38),
        ]),
    );
    speakers.insert("春日部つむぎ".to_string(), styles(&[("ノーマル", 8)]));
    speakers.insert("冥鳴ひまり".to_string(), styles(&[("ノーマル", 14)]));
    speakers
}

/// 朗读规则
#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackConfig {
    /// 超过此字符数的文本被截断
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// 截断后保留的开头字符数
    #[serde(default = "default_keep_chars")]
    pub truncate_keep_chars: usize,

    #[serde(default = "default_omission_marker")]
    pub omission_marker: String,

    /// 播放完成回报的宽限时间（秒），加在 clip 时长之上
    #[serde(default = "default_completion_grace")]
    pub completion_grace_secs: u64,

    /// 是否播报成员入室
    #[serde(default = "default_announce_joins")]
    pub announce_joins: bool,
}

fn default_max_chars() -> usize {
    500
}

fn default_keep_chars() -> usize {
    10
}

fn default_omission_marker() -> String {
    "以下略".to_string()
}

fn default_completion_grace() -> u64 {
    15
}

fn default_announce_joins() -> bool {
    true
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            truncate_keep_chars: default_keep_chars(),
            omission_marker: default_omission_marker(),
            completion_grace_secs: default_completion_grace(),
            announce_joins: default_announce_joins(),
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/yomiage.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 合成音频的临时目录
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("data/audio")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            audio_dir: default_audio_dir(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5080);
        assert_eq!(config.voicevox.url, "http://localhost:50021");
        assert_eq!(config.voicevox.default_speaker_id, 3);
        assert_eq!(config.playback.max_chars, 500);
        assert_eq!(config.database.path, "data/yomiage.db");
    }

    #[test]
    fn test_default_speakers() {
        let speakers = default_speakers();
        assert_eq!(speakers.len(), 4);
        assert_eq!(speakers["ずんだもん"]["ノーマル"], 3);
        assert_eq!(speakers["四国めたん"]["ノーマル"], 2);
        assert!(speakers.values().all(|styles| styles.contains_key("ノーマル")));
    }

    #[test]
    fn test_public_base_url() {
        let mut config = ServerConfig::default();
        assert_eq!(config.public_base_url(), "http://localhost:5080");

        config.base_url = Some("http://yomiage:5080".to_string());
        assert_eq!(config.public_base_url(), "http://yomiage:5080");
    }
}
