//! Yomiage - 聊天频道的 VOICEVOX 朗读服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Playback Context: Guild 播放队列与状态机
//! - Dictionary Context: 自定义读音辞书
//! - Voice Context: 话者目录与用户语音设置
//!
//! 应用层 (application/):
//! - Ports: 端口定义（合成引擎、设置存储 / 缓存、音频存储、播放器、网关、播放控制）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: JSON API + Bridge WebSocket
//! - Bridge: 外部网关进程的指令与回报
//! - Worker: 每个 Guild 一个播放 worker
//! - Memory: 设置读穿缓存
//! - Persistence: SQLite 存储
//! - Adapters: VOICEVOX Client, 音频文件存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};

#[cfg(test)]
mod test_support;
