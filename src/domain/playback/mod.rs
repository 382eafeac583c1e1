//! Playback Context - Guild 播放状态机限界上下文
//!
//! 职责:
//! - 播放条目（文本 / 媒体）
//! - FIFO 队列
//! - Idle / Playing 状态机与播放凭证

mod aggregate;
mod queue;
mod value_objects;

pub use aggregate::{Dispatch, GuildPlayback};
pub use queue::PlaybackQueue;
pub use value_objects::{PlaybackItem, PlaybackState, PlayingPhase, Ticket};
