//! WebSocket Handler
//!
//! `/ws/events` 推送资源变更事件；带 `project_id` 时只推送该企划的事件

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

use crate::infrastructure::events::WsEvent;
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub project_id: Option<Uuid>,
}

pub async fn events_websocket_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<EventsQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_events_socket(socket, query.project_id, state))
}

async fn handle_events_socket(socket: WebSocket, project_id: Option<Uuid>, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let mut event_rx: broadcast::Receiver<WsEvent> = match project_id {
        Some(id) => state.event_publisher.subscribe_project(id),
        None => state.event_publisher.subscribe_global(),
    };

    tracing::info!(project_id = ?project_id, "Events WebSocket connected");

    // 事件转发任务
    let mut forward_task = tokio::spawn(async move {
        loop {
            let event = match event_rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    // 客户端太慢，丢弃积压的事件继续推送
                    tracing::warn!(skipped, "Events WebSocket lagged");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            let msg = match serde_json::to_string(&event) {
                Ok(json) => Message::Text(json),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize event");
                    continue;
                }
            };

            if let Err(e) = sender.send(msg).await {
                tracing::debug!(error = %e, "Failed to send WebSocket message");
                break;
            }
        }
    });

    // 接收客户端消息（心跳 / 关闭）
    let mut receive_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    tracing::info!("Events WebSocket closed by client");
                    break;
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Events WebSocket error");
                    break;
                }
                _ => {}
            }
        }
    });

    // 任一方结束即终止另一方，等待其退出后接收端才会被释放
    tokio::select! {
        _ = &mut forward_task => {
            receive_task.abort();
            let _ = receive_task.await;
        }
        _ = &mut receive_task => {
            forward_task.abort();
            let _ = forward_task.await;
        }
    }

    if let Some(id) = project_id {
        state.event_publisher.release_project(id);
    }
    tracing::info!(project_id = ?project_id, "Events WebSocket disconnected");
}
