//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_player;
mod audio_storage;
mod playback_control;
mod settings_cache;
mod settings_store;
mod synthesis_engine;
mod voice_gateway;

pub use audio_player::{AudioPlayerPort, PlaybackCompletion, PlaybackOutcome, PlayerError};
pub use audio_storage::{AudioClip, AudioStorageError, AudioStoragePort};
pub use playback_control::{GuildConnection, PlaybackControlPort, PlaybackError, PlaybackStatus};
pub use settings_cache::SettingsCachePort;
pub use settings_store::{RepositoryError, SettingsStorePort};
pub use synthesis_engine::{
    SynthesisCause, SynthesisEnginePort, SynthesisError, SynthesisRecipe, SynthesisStep,
    SynthesizedAudio, INTONATION_SCALE, PITCH_SCALE, SPEED_SCALE,
};
pub use voice_gateway::{GatewayError, MediaSenderPort, NotifierPort, VoiceGatewayPort};
