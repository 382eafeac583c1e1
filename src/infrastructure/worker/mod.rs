//! Worker Layer - Background Task Processing
//!
//! 每个 Guild 一个播放 worker

mod guild_worker;
mod playback_engine;

pub use guild_worker::ItemError;
pub use playback_engine::{PlaybackDeps, PlaybackEngine, PlaybackEngineConfig};
