//! Event Publisher Implementation
//!
//! WebSocket 事件推送实现：全局通道接收所有事件，
//! 每个企划另有独立通道，只接收该企划的事件

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 100;

/// 变更动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

/// 企划下的资源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Character,
    Plot,
    Synopsis,
    Chapter,
    Episode,
    Draft,
}

/// WebSocket 事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum WsEvent {
    /// 企划本身变更（含写作步骤切换）
    ProjectChanged {
        project_id: Uuid,
        action: ChangeAction,
    },
    /// 企划下的资源变更
    ResourceChanged {
        project_id: Uuid,
        resource: ResourceKind,
        resource_id: Uuid,
        action: ChangeAction,
    },
}

impl WsEvent {
    pub fn project_id(&self) -> Uuid {
        match self {
            WsEvent::ProjectChanged { project_id, .. }
            | WsEvent::ResourceChanged { project_id, .. } => *project_id,
        }
    }
}

/// 事件发布器
pub struct EventPublisher {
    /// project_id -> broadcast sender
    project_channels: DashMap<Uuid, broadcast::Sender<WsEvent>>,
    global_channel: broadcast::Sender<WsEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        let (global_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            project_channels: DashMap::new(),
            global_channel: global_tx,
        }
    }

    /// 订阅全部事件
    pub fn subscribe_global(&self) -> broadcast::Receiver<WsEvent> {
        self.global_channel.subscribe()
    }

    /// 订阅单个企划的事件
    pub fn subscribe_project(&self, project_id: Uuid) -> broadcast::Receiver<WsEvent> {
        self.project_channels
            .entry(project_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// 没有订阅者时回收企划通道
    pub fn release_project(&self, project_id: Uuid) {
        self.project_channels
            .remove_if(&project_id, |_, sender| sender.receiver_count() == 0);
    }

    pub fn publish_project(&self, project_id: Uuid, action: ChangeAction) {
        self.publish(WsEvent::ProjectChanged { project_id, action });

        if action == ChangeAction::Deleted {
            self.project_channels.remove(&project_id);
        }
    }

    pub fn publish_resource(
        &self,
        project_id: Uuid,
        resource: ResourceKind,
        resource_id: Uuid,
        action: ChangeAction,
    ) {
        self.publish(WsEvent::ResourceChanged {
            project_id,
            resource,
            resource_id,
            action,
        });
    }

    fn publish(&self, event: WsEvent) {
        let project_id = event.project_id();

        if let Some(sender) = self.project_channels.get(&project_id) {
            if let Err(e) = sender.send(event.clone()) {
                tracing::debug!(
                    project_id = %project_id,
                    error = %e,
                    "Failed to publish project event (no receivers)"
                );
            }
        }

        if let Err(e) = self.global_channel.send(event) {
            tracing::debug!(
                project_id = %project_id,
                error = %e,
                "Failed to publish global event (no receivers)"
            );
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
