//! Speaker / Voice settings HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::commands::{SetSpeaker, SetVoiceSettings};
use crate::application::queries::handlers::SpeakerResponse;
use crate::application::queries::{GetVoiceProfile, ListSpeakers};
use crate::domain::voice::VoiceProfile;
use crate::infrastructure::http::dto::{
    ApiResponse, MessageResponse, SetSpeakerRequest, SetSpeakerResponse, SetVoiceSettingsRequest,
    UserRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 话者一览
pub async fn list_speakers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<SpeakerResponse>>>, ApiError> {
    let speakers = state.list_speakers_handler.handle(ListSpeakers).await?;
    Ok(Json(ApiResponse::success(speakers)))
}

/// 设置话者
pub async fn set_speaker(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetSpeakerRequest>,
) -> Result<Json<ApiResponse<SetSpeakerResponse>>, ApiError> {
    let command = SetSpeaker {
        user_id: req.user_id,
        speaker_name: req.speaker_name,
        style_name: req.style_name,
    };

    let result = state.set_speaker_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(SetSpeakerResponse {
        speaker_name: result.choice.speaker_name,
        style_name: result.choice.style_name,
        style_id: result.choice.style_id.get(),
        message: result.message,
    })))
}

/// 当前有效的合成配置（缺失项已补默认值）
pub async fn get_voice_settings(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UserRequest>,
) -> Result<Json<ApiResponse<VoiceProfile>>, ApiError> {
    let profile = state
        .get_voice_profile_handler
        .handle(GetVoiceProfile {
            user_id: req.user_id,
        })
        .await?;
    Ok(Json(ApiResponse::success(profile)))
}

/// 设置合成参数
pub async fn set_voice_settings(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetVoiceSettingsRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let command = SetVoiceSettings {
        user_id: req.user_id,
        intensity: req.intensity,
        pitch: req.pitch,
        speed: req.speed,
    };

    let result = state.set_voice_settings_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(
        result.message,
    ))))
}
