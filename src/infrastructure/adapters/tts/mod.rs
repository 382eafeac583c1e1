//! TTS Adapter - VOICEVOX HTTP 客户端实现

mod voicevox_client;

pub use voicevox_client::*;
