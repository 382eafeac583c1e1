//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（合成引擎、设置存储 / 缓存、播放器、网关、播放控制）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - profile_resolver: 用户合成配置解析
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
mod profile_resolver;
pub mod queries;

pub use error::ApplicationError;
pub use profile_resolver::VoiceProfileResolver;
