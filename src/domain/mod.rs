//! Domain Layer - 领域层
//!
//! 包含三个限界上下文:
//! - Playback Context: Guild 播放队列与状态机
//! - Dictionary Context: 自定义读音辞书
//! - Voice Context: 话者目录与用户语音设置

pub mod dictionary;
pub mod playback;
pub mod voice;

mod ids;
// 入口过滤与文本变换
pub mod text_filter;

pub use ids::{ChannelId, GuildId, UserId};
pub use text_filter::{check_readable, transform, RejectReason, TextRules};
