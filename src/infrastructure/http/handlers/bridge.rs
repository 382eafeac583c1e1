//! Bridge WebSocket Handler - 外部网关进程的接入点

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;

use crate::infrastructure::http::state::AppState;

/// 网关连接（同一时刻只保留一个）
pub async fn bridge_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_bridge_socket(socket, state))
}

async fn handle_bridge_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let hub = state.bridge.clone();
    let (generation, mut commands) = hub.attach();

    // 指令转发任务
    let forward_task = tokio::spawn(async move {
        while let Some(command) = commands.recv().await {
            let msg = match serde_json::to_string(&command) {
                Ok(json) => Message::Text(json),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize bridge command");
                    continue;
                }
            };

            if let Err(e) = sender.send(msg).await {
                tracing::debug!(generation, error = %e, "Failed to send bridge command");
                break;
            }
        }
        let _ = sender.close().await;
    });

    // 接收网关上报
    let inbound = hub.clone();
    let receive_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => inbound.handle_message(&text),
                Ok(Message::Close(_)) => {
                    tracing::info!(generation, "Bridge closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::debug!(generation, error = %e, "Bridge WebSocket error");
                    break;
                }
                // ping/pong 由 axum 处理
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = forward_task => {}
        _ = receive_task => {}
    }

    hub.detach(generation);
}
