//! Application State
//!
//! 所有 Command / Query Handler 的集合

use std::sync::Arc;

use crate::application::commands::handlers::{
    IngestMessageHandler, JoinVoiceHandler, LeaveVoiceHandler, RegisterWordHandler,
    RemoveWordHandler, SetSpeakerHandler, SetVoiceSettingsHandler, SkipPlaybackHandler,
    VoiceStateHandler,
};
use crate::application::ports::{
    AudioStoragePort, NotifierPort, PlaybackControlPort, SettingsCachePort, VoiceGatewayPort,
};
use crate::application::queries::handlers::{
    GetPlaybackStatusHandler, GetVoiceProfileHandler, ListSpeakersHandler, ListWordsHandler,
};
use crate::application::VoiceProfileResolver;
use crate::domain::voice::SpeakerCatalog;
use crate::infrastructure::bridge::BridgeHub;

/// 构建 AppState 所需的端口
pub struct AppPorts {
    pub settings: Arc<dyn SettingsCachePort>,
    pub playback: Arc<dyn PlaybackControlPort>,
    pub gateway: Arc<dyn VoiceGatewayPort>,
    pub notifier: Arc<dyn NotifierPort>,
    pub storage: Arc<dyn AudioStoragePort>,
    pub bridge: Arc<BridgeHub>,
    pub catalog: Arc<SpeakerCatalog>,
    pub profiles: VoiceProfileResolver,
    pub announce_joins: bool,
}

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub storage: Arc<dyn AudioStoragePort>,
    pub bridge: Arc<BridgeHub>,

    // ========== Command Handlers ==========
    pub ingest_handler: IngestMessageHandler,
    pub voice_state_handler: VoiceStateHandler,
    pub join_handler: JoinVoiceHandler,
    pub leave_handler: LeaveVoiceHandler,
    pub skip_handler: SkipPlaybackHandler,
    pub register_word_handler: RegisterWordHandler,
    pub remove_word_handler: RemoveWordHandler,
    pub set_speaker_handler: SetSpeakerHandler,
    pub set_voice_settings_handler: SetVoiceSettingsHandler,

    // ========== Query Handlers ==========
    pub list_words_handler: ListWordsHandler,
    pub get_voice_profile_handler: GetVoiceProfileHandler,
    pub list_speakers_handler: ListSpeakersHandler,
    pub playback_status_handler: GetPlaybackStatusHandler,
}

impl AppState {
    pub fn new(ports: AppPorts) -> Self {
        let AppPorts {
            settings,
            playback,
            gateway,
            notifier,
            storage,
            bridge,
            catalog,
            profiles,
            announce_joins,
        } = ports;

        Self {
            storage,
            bridge,

            ingest_handler: IngestMessageHandler::new(playback.clone()),
            voice_state_handler: VoiceStateHandler::new(
                gateway.clone(),
                notifier.clone(),
                playback.clone(),
                announce_joins,
            ),
            join_handler: JoinVoiceHandler::new(gateway.clone(), notifier, playback.clone()),
            leave_handler: LeaveVoiceHandler::new(gateway, playback.clone()),
            skip_handler: SkipPlaybackHandler::new(playback.clone()),
            register_word_handler: RegisterWordHandler::new(settings.clone()),
            remove_word_handler: RemoveWordHandler::new(settings.clone()),
            set_speaker_handler: SetSpeakerHandler::new(catalog.clone(), settings.clone()),
            set_voice_settings_handler: SetVoiceSettingsHandler::new(settings.clone()),

            list_words_handler: ListWordsHandler::new(settings),
            get_voice_profile_handler: GetVoiceProfileHandler::new(profiles),
            list_speakers_handler: ListSpeakersHandler::new(catalog),
            playback_status_handler: GetPlaybackStatusHandler::new(playback),
        }
    }
}
