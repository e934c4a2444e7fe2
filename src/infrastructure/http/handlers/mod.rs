//! HTTP Handlers
//!
//! 写操作成功后向事件通道广播变更，客户端据此刷新缓存

mod chapters;
mod characters;
mod episodes;
mod generate;
mod ping;
mod projects;
mod story;
mod structure;
mod websocket;

pub use chapters::*;
pub use characters::*;
pub use episodes::*;
pub use generate::*;
pub use ping::*;
pub use projects::*;
pub use story::*;
pub use structure::*;
pub use websocket::*;

use uuid::Uuid;

use crate::infrastructure::events::{ChangeAction, ResourceKind};
use crate::infrastructure::http::state::AppState;

/// 广播章节下属资源（分集 / 正文）的变更
///
/// 事件按企划分发，需要先由章节找到所属企划
async fn publish_chapter_resource(
    state: &AppState,
    chapter_id: Uuid,
    resource: ResourceKind,
    resource_id: Uuid,
    action: ChangeAction,
) {
    match state.repo.find_chapter(chapter_id).await {
        Ok(Some(chapter)) => {
            state
                .event_publisher
                .publish_resource(chapter.project_id, resource, resource_id, action);
        }
        Ok(None) => {
            tracing::debug!(chapter_id = %chapter_id, "Chapter gone, change event skipped");
        }
        Err(e) => {
            tracing::warn!(chapter_id = %chapter_id, error = %e, "Failed to resolve project for change event");
        }
    }
}
