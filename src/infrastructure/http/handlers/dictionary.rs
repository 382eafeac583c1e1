//! Dictionary HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::commands::{RegisterWord, RemoveWord};
use crate::application::queries::ListWords;
use crate::domain::dictionary::DictionaryEntry;
use crate::infrastructure::http::dto::{
    ApiResponse, GuildRequest, RegisterWordRequest, RegisterWordResponse, RemoveWordRequest,
    RemoveWordResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 登录单词
pub async fn register_word(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterWordRequest>,
) -> Result<Json<ApiResponse<RegisterWordResponse>>, ApiError> {
    let command = RegisterWord {
        guild_id: req.guild_id,
        word: req.word,
        pronunciation: req.pronunciation,
        author: req.author,
    };

    let result = state.register_word_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(RegisterWordResponse {
        id: result.entry.id.to_string(),
        message: result.message,
    })))
}

/// 删除单词
pub async fn remove_word(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RemoveWordRequest>,
) -> Result<Json<ApiResponse<RemoveWordResponse>>, ApiError> {
    let result = state
        .remove_word_handler
        .handle(RemoveWord {
            guild_id: req.guild_id,
            word: req.word,
        })
        .await?;

    Ok(Json(ApiResponse::success(RemoveWordResponse {
        removed: result.removed.is_some(),
        message: result.message,
    })))
}

/// 辞书一览（插入顺序）
pub async fn list_words(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GuildRequest>,
) -> Result<Json<ApiResponse<Vec<DictionaryEntry>>>, ApiError> {
    let entries = state
        .list_words_handler
        .handle(ListWords {
            guild_id: req.guild_id,
        })
        .await?;
    Ok(Json(ApiResponse::success(entries)))
}
