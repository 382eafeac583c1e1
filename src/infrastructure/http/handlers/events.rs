//! Event Handlers - 网关转发的平台事件

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::commands::handlers::{IngestResponse, VoiceStateOutcome};
use crate::application::commands::{IngestMessage, VoiceStateChange};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 文字频道新消息
pub async fn message_event(
    State(state): State<Arc<AppState>>,
    Json(msg): Json<IngestMessage>,
) -> Result<Json<ApiResponse<IngestResponse>>, ApiError> {
    let result = state.ingest_handler.handle(msg).await?;
    Ok(Json(ApiResponse::success(result)))
}

/// 成员语音状态变化
pub async fn voice_state_event(
    State(state): State<Arc<AppState>>,
    Json(change): Json<VoiceStateChange>,
) -> Result<Json<ApiResponse<VoiceStateOutcome>>, ApiError> {
    let outcome = state.voice_state_handler.handle(change).await?;
    Ok(Json(ApiResponse::success(outcome)))
}
