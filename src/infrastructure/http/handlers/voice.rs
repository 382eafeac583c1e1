//! Voice HTTP Handlers - 语音频道连接与播放控制

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::commands::{JoinVoice, LeaveVoice, SkipPlayback};
use crate::application::ports::PlaybackStatus;
use crate::application::queries::GetPlaybackStatus;
use crate::infrastructure::http::dto::{
    ApiResponse, GuildRequest, JoinRequest, MessageResponse, SkipResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 加入语音频道
pub async fn join(
    State(state): State<Arc<AppState>>,
    Json(req): Json<JoinRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let command = JoinVoice {
        guild_id: req.guild_id,
        voice_channel: req.voice_channel_id,
        text_channel: req.text_channel_id,
    };

    let result = state.join_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(
        result.message,
    ))))
}

/// 离开语音频道
pub async fn leave(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GuildRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let message = state
        .leave_handler
        .handle(LeaveVoice {
            guild_id: req.guild_id,
        })
        .await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(message))))
}

/// 跳过当前条目
pub async fn skip(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GuildRequest>,
) -> Result<Json<ApiResponse<SkipResponse>>, ApiError> {
    let result = state
        .skip_handler
        .handle(SkipPlayback {
            guild_id: req.guild_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(SkipResponse {
        skipped: result.skipped,
        message: result.message,
    })))
}

/// 播放状态
pub async fn status(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GuildRequest>,
) -> Result<Json<ApiResponse<PlaybackStatus>>, ApiError> {
    let status = state
        .playback_status_handler
        .handle(GetPlaybackStatus {
            guild_id: req.guild_id,
        })
        .await?;
    Ok(Json(ApiResponse::success(status)))
}
