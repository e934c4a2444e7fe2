//! Events - 变更事件推送

mod publisher;

pub use publisher::{ChangeAction, EventPublisher, ResourceKind, WsEvent};
