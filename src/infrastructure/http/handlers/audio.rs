//! Audio Handlers - 合成音频的临时下载

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 下载 clip，播放完成后文件即被删除
pub async fn download_clip(
    State(state): State<Arc<AppState>>,
    Path(clip_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let data = state.storage.read_clip(clip_id).await?;

    tracing::debug!(clip_id = %clip_id, size = data.len(), "Serving audio clip");

    Ok((
        [
            (header::CONTENT_TYPE, "audio/wav"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        data,
    )
        .into_response())
}
