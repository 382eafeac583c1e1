//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                   GET   健康检查
//! - /api/events/message         POST  文字频道新消息
//! - /api/events/voice_state     POST  成员语音状态变化
//! - /api/voice/join             POST  加入语音频道
//! - /api/voice/leave            POST  离开语音频道
//! - /api/voice/skip             POST  跳过当前条目
//! - /api/voice/status           POST  播放状态
//! - /api/dictionary/register    POST  登录单词
//! - /api/dictionary/remove      POST  删除单词
//! - /api/dictionary/list        POST  辞书一览
//! - /api/speaker/list           GET   话者一览
//! - /api/speaker/set            POST  设置话者
//! - /api/voice_settings/get     POST  获取合成配置
//! - /api/voice_settings/set     POST  设置合成参数
//! - /api/audio/{clip_id}        GET   下载合成音频
//! - /ws/bridge                  WS    外部网关接入

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/bridge", get(handlers::bridge_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/events", event_routes())
        .nest("/voice", voice_routes())
        .nest("/dictionary", dictionary_routes())
        .nest("/speaker", speaker_routes())
        .nest("/voice_settings", voice_settings_routes())
        .route("/audio/:clip_id", get(handlers::download_clip))
}

fn event_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/message", post(handlers::message_event))
        .route("/voice_state", post(handlers::voice_state_event))
}

fn voice_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/join", post(handlers::join))
        .route("/leave", post(handlers::leave))
        .route("/skip", post(handlers::skip))
        .route("/status", post(handlers::status))
}

fn dictionary_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(handlers::register_word))
        .route("/remove", post(handlers::remove_word))
        .route("/list", post(handlers::list_words))
}

fn speaker_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/list", get(handlers::list_speakers))
        .route("/set", post(handlers::set_speaker))
}

fn voice_settings_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/get", post(handlers::get_voice_settings))
        .route("/set", post(handlers::set_voice_settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::collections::BTreeMap;
    use std::time::Duration;
    use tower::util::ServiceExt;

    use crate::application::ports::AudioStoragePort;
    use crate::application::VoiceProfileResolver;
    use crate::domain::voice::SpeakerCatalog;
    use crate::infrastructure::bridge::BridgeHub;
    use crate::infrastructure::http::server::build_router;
    use crate::infrastructure::http::state::AppPorts;
    use crate::infrastructure::worker::PlaybackEngineConfig;
    use crate::test_support::{wait_until, EngineHarness, PlayerMode, DEFAULT_STYLE};

    fn catalog() -> SpeakerCatalog {
        let mut zundamon = BTreeMap::new();
        zundamon.insert("ノーマル".to_string(), 3);
        zundamon.insert("あまあま".to_string(), 1);
        let mut speakers = BTreeMap::new();
        speakers.insert("ずんだもん".to_string(), zundamon);
        SpeakerCatalog::new(speakers, DEFAULT_STYLE.get())
    }

    fn app() -> (Router, EngineHarness) {
        let h = EngineHarness::new(
            PlayerMode::AutoComplete(Duration::from_millis(5)),
            PlaybackEngineConfig::default(),
        );
        let state = AppState::new(AppPorts {
            settings: h.cache.clone(),
            playback: h.engine.clone(),
            gateway: h.gateway.clone(),
            notifier: h.gateway.clone(),
            storage: h.storage.clone(),
            bridge: BridgeHub::new("http://localhost:5080").arc(),
            catalog: Arc::new(catalog()),
            profiles: VoiceProfileResolver::new(h.cache.clone(), DEFAULT_STYLE),
            announce_joins: true,
        });
        (build_router(Arc::new(state)), h)
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Value {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn post(app: &Router, uri: &str, body: Value) -> Value {
        call(app, "POST", uri, Some(body)).await
    }

    #[tokio::test]
    async fn test_ping() {
        let (app, _h) = app();
        let resp = call(&app, "GET", "/api/ping", None).await;
        assert_eq!(resp["errno"], 0);
        assert_eq!(resp["data"]["status"], "ok");
        assert_eq!(resp["error"], "");
        assert_eq!(resp["data"]["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(resp["data"]["bridge_connected"], false);
    }

    #[tokio::test]
    async fn test_join_then_message_is_spoken() {
        let (app, h) = app();

        let resp = post(
            &app,
            "/api/voice/join",
            json!({"guild_id": "1", "voice_channel_id": "10", "text_channel_id": "20"}),
        )
        .await;
        assert_eq!(resp["errno"], 0);
        assert_eq!(resp["data"]["message"], "接続しました。");

        let resp = post(
            &app,
            "/api/events/message",
            json!({"guild_id": "1", "channel_id": "20", "author_id": "5", "content": "こんにちは"}),
        )
        .await;
        assert_eq!(resp["data"]["enqueued"], 1);

        wait_until(|| h.player.played().contains(&"こんにちは".to_string())).await;

        let status = post(&app, "/api/voice/status", json!({"guild_id": "1"})).await;
        assert_eq!(status["data"]["output_channel"], "10");
        assert_eq!(status["data"]["notify_channel"], "20");
    }

    #[tokio::test]
    async fn test_join_without_voice_channel_is_rejected() {
        let (app, _h) = app();
        let resp = post(
            &app,
            "/api/voice/join",
            json!({"guild_id": "1", "text_channel_id": "20"}),
        )
        .await;
        assert_eq!(resp["errno"], 400);
        assert_eq!(
            resp["error"],
            "あなたは現在ボイスチャンネルに接続されていません。"
        );
    }

    #[tokio::test]
    async fn test_leave_without_connection() {
        let (app, _h) = app();
        let resp = post(&app, "/api/voice/leave", json!({"guild_id": "1"})).await;
        assert_eq!(resp["errno"], 409);
        assert!(resp["data"].is_null());
    }

    #[tokio::test]
    async fn test_message_to_unconnected_guild_is_skipped() {
        let (app, _h) = app();
        let resp = post(
            &app,
            "/api/events/message",
            json!({"guild_id": "1", "channel_id": "20", "author_id": "5", "content": "やあ"}),
        )
        .await;
        assert_eq!(resp["errno"], 0);
        assert_eq!(resp["data"]["skipped"], "not_connected");
    }

    #[tokio::test]
    async fn test_dictionary_roundtrip() {
        let (app, _h) = app();

        let bad = post(
            &app,
            "/api/dictionary/register",
            json!({"guild_id": "1", "word": "w", "pronunciation": "double-u", "author": "a"}),
        )
        .await;
        assert_eq!(bad["errno"], 400);

        let ok = post(
            &app,
            "/api/dictionary/register",
            json!({"guild_id": "1", "word": "w", "pronunciation": "ダブリュー", "author": "a"}),
        )
        .await;
        assert_eq!(ok["errno"], 0);
        assert!(ok["data"]["id"].as_str().unwrap().parse::<u64>().is_ok());

        let list = post(&app, "/api/dictionary/list", json!({"guild_id": "1"})).await;
        assert_eq!(list["data"][0]["word"], "w");
        assert_eq!(list["data"][0]["pronunciation"], "ダブリュー");

        let removed = post(
            &app,
            "/api/dictionary/remove",
            json!({"guild_id": "1", "word": "w"}),
        )
        .await;
        assert_eq!(removed["data"]["removed"], true);

        let again = post(
            &app,
            "/api/dictionary/remove",
            json!({"guild_id": "1", "word": "w"}),
        )
        .await;
        assert_eq!(again["data"]["removed"], false);
    }

    #[tokio::test]
    async fn test_speaker_and_voice_settings() {
        let (app, _h) = app();

        let list = call(&app, "GET", "/api/speaker/list", None).await;
        assert_eq!(list["data"][0]["name"], "ずんだもん");

        let unknown = post(
            &app,
            "/api/speaker/set",
            json!({"user_id": "7", "speaker_name": "だれか"}),
        )
        .await;
        assert_eq!(unknown["errno"], 400);

        let set = post(
            &app,
            "/api/speaker/set",
            json!({"user_id": "7", "speaker_name": "ずんだもん", "style_name": "あまあま"}),
        )
        .await;
        assert_eq!(set["data"]["style_id"], 1);

        let out_of_range = post(
            &app,
            "/api/voice_settings/set",
            json!({"user_id": "7", "intensity": 1.0, "pitch": 0.0, "speed": 3.0}),
        )
        .await;
        assert_eq!(out_of_range["errno"], 400);

        let ok = post(
            &app,
            "/api/voice_settings/set",
            json!({"user_id": "7", "intensity": 1.2, "pitch": 0.1, "speed": 1.5}),
        )
        .await;
        assert_eq!(ok["errno"], 0);

        let profile = post(&app, "/api/voice_settings/get", json!({"user_id": "7"})).await;
        assert_eq!(profile["data"]["style_id"], 1);
        assert_eq!(profile["data"]["speed"], 1.5);
    }

    #[tokio::test]
    async fn test_audio_download() {
        let (app, h) = app();
        let clip = h.storage.save_clip(b"RIFFdata").await.unwrap();

        let request = Request::builder()
            .uri(format!("/api/audio/{}", clip.id))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.headers()["content-type"], "audio/wav");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"RIFFdata");

        h.storage.release_clip(clip.id).await.unwrap();
        let missing = call(&app, "GET", &format!("/api/audio/{}", clip.id), None).await;
        assert_eq!(missing["errno"], 404);
    }
}
