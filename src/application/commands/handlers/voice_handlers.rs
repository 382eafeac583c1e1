//! Voice Command Handlers

use std::sync::Arc;

use crate::application::commands::{SetSpeaker, SetVoiceSettings};
use crate::application::error::ApplicationError;
use crate::application::ports::SettingsCachePort;
use crate::domain::voice::{SpeakerCatalog, SpeakerChoice, UserVoiceSettings, VoiceParams};

// ============================================================================
// SetSpeaker
// ============================================================================

/// 话者设置响应
#[derive(Debug, Clone)]
pub struct SetSpeakerResponse {
    pub choice: SpeakerChoice,
    pub message: String,
}

/// SetSpeaker Handler
pub struct SetSpeakerHandler {
    catalog: Arc<SpeakerCatalog>,
    settings: Arc<dyn SettingsCachePort>,
}

impl SetSpeakerHandler {
    pub fn new(catalog: Arc<SpeakerCatalog>, settings: Arc<dyn SettingsCachePort>) -> Self {
        Self { catalog, settings }
    }

    pub async fn handle(&self, cmd: SetSpeaker) -> Result<SetSpeakerResponse, ApplicationError> {
        let choice = self
            .catalog
            .resolve(&cmd.speaker_name, cmd.style_name.as_deref())?;

        if let Some(requested) = cmd.style_name.as_deref() {
            if requested != choice.style_name {
                tracing::debug!(
                    user_id = %cmd.user_id,
                    requested = %requested,
                    fallback = %choice.style_name,
                    "Unknown style, falling back"
                );
            }
        }

        self.settings.set_speaker(cmd.user_id, choice.clone()).await?;

        tracing::info!(
            user_id = %cmd.user_id,
            speaker = %choice.speaker_name,
            style_id = %choice.style_id,
            "Speaker updated"
        );

        let message = format!(
            "話者が {}（スタイル: {}）に設定されました。",
            choice.speaker_name, choice.style_name
        );
        Ok(SetSpeakerResponse { choice, message })
    }
}

// ============================================================================
// SetVoiceSettings
// ============================================================================

/// 合成参数设置响应
#[derive(Debug, Clone)]
pub struct SetVoiceSettingsResponse {
    pub settings: UserVoiceSettings,
    pub message: String,
}

/// SetVoiceSettings Handler
pub struct SetVoiceSettingsHandler {
    settings: Arc<dyn SettingsCachePort>,
}

impl SetVoiceSettingsHandler {
    pub fn new(settings: Arc<dyn SettingsCachePort>) -> Self {
        Self { settings }
    }

    pub async fn handle(
        &self,
        cmd: SetVoiceSettings,
    ) -> Result<SetVoiceSettingsResponse, ApplicationError> {
        let params = VoiceParams::new(cmd.intensity, cmd.pitch, cmd.speed)?;
        let settings = self.settings.set_voice_params(cmd.user_id, params).await?;

        tracing::info!(
            user_id = %cmd.user_id,
            intensity = params.intensity,
            pitch = params.pitch,
            speed = params.speed,
            "Voice settings updated"
        );

        let message = format!(
            "音声設定を更新しました: 抑揚={}, 音高={}, 話速={}",
            params.intensity, params.pitch, params.speed
        );
        Ok(SetVoiceSettingsResponse { settings, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::voice::StyleId;
    use crate::domain::UserId;
    use crate::infrastructure::memory::InMemorySettingsCache;
    use crate::test_support::MemorySettingsStore;
    use std::collections::BTreeMap;

    const USER: UserId = UserId::new(5);

    fn catalog() -> Arc<SpeakerCatalog> {
        let mut styles = BTreeMap::new();
        styles.insert("ノーマル".to_string(), 3);
        styles.insert("あまあま".to_string(), 1);
        let mut speakers = BTreeMap::new();
        speakers.insert("ずんだもん".to_string(), styles);
        Arc::new(SpeakerCatalog::new(speakers, 3))
    }

    fn setup() -> (Arc<MemorySettingsStore>, SetSpeakerHandler, SetVoiceSettingsHandler) {
        let store = Arc::new(MemorySettingsStore::new());
        let cache = InMemorySettingsCache::new(store.clone()).arc();
        (
            store,
            SetSpeakerHandler::new(catalog(), cache.clone()),
            SetVoiceSettingsHandler::new(cache),
        )
    }

    fn set_speaker(speaker: &str, style: Option<&str>) -> SetSpeaker {
        SetSpeaker {
            user_id: USER,
            speaker_name: speaker.to_string(),
            style_name: style.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_unknown_speaker_lists_valid_names() {
        let (store, handler, _) = setup();
        let err = handler.handle(set_speaker("誰か", None)).await.unwrap_err();
        assert!(err.to_string().contains("ずんだもん"));
        assert!(store.user(USER).is_none());
    }

    #[tokio::test]
    async fn test_unknown_style_falls_back_to_normal() {
        let (store, handler, _) = setup();
        let response = handler
            .handle(set_speaker("ずんだもん", Some("ささやき")))
            .await
            .unwrap();
        assert_eq!(response.choice.style_id, StyleId::new(3));
        assert_eq!(response.choice.style_name, "ノーマル");
        assert_eq!(
            store.user(USER).unwrap().speaker.unwrap().style_id,
            StyleId::new(3)
        );
    }

    #[tokio::test]
    async fn test_known_style_selected() {
        let (_, handler, _) = setup();
        let response = handler
            .handle(set_speaker("ずんだもん", Some("あまあま")))
            .await
            .unwrap();
        assert_eq!(response.choice.style_id, StyleId::new(1));
    }

    #[tokio::test]
    async fn test_voice_settings_range_checked() {
        let (store, _, handler) = setup();
        let err = handler
            .handle(SetVoiceSettings {
                user_id: USER,
                intensity: 1.0,
                pitch: 0.5,
                speed: 1.0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
        assert!(store.user(USER).is_none());
    }

    #[tokio::test]
    async fn test_voice_settings_keep_speaker() {
        let (store, speaker_handler, settings_handler) = setup();
        speaker_handler
            .handle(set_speaker("ずんだもん", Some("あまあま")))
            .await
            .unwrap();
        let response = settings_handler
            .handle(SetVoiceSettings {
                user_id: USER,
                intensity: 1.5,
                pitch: 0.15,
                speed: 2.0,
            })
            .await
            .unwrap();

        assert_eq!(response.settings.speaker.unwrap().style_id, StyleId::new(1));
        assert_eq!(store.user(USER).unwrap().pitch, Some(0.15));
    }
}
