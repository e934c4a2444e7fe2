//! Chapter HTTP Handlers

use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{CreateChapter, DeleteChapter, UpdateChapter};
use crate::application::queries::{GetPlot, ListChapters};
use crate::application::ApplicationError;
use crate::domain::structure::{ChapterPlan, StoryStructure};
use crate::infrastructure::events::{ChangeAction, ResourceKind};
use crate::infrastructure::http::dto::{ApiResponse, ChapterResponse, DeletedResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiJson, ApiPath};
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

/// 章节计划参数
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub total_chapters: i64,
    /// 缺省时沿用已保存情节的结构
    #[serde(default)]
    pub structure: Option<String>,
    pub estimated_length: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateChapterRequest {
    pub number: Option<u32>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub structure: Option<String>,
    pub estimated_words: Option<u32>,
    pub estimated_reading_time: Option<u32>,
    pub plan: Option<PlanRequest>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateChapterRequest {
    pub number: Option<u32>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub structure: Option<String>,
    pub estimated_words: Option<u32>,
    pub estimated_reading_time: Option<u32>,
}

/// 解析章节计划
///
/// 结构优先取请求中的值，其次取企划已保存的情节结构，最后为起承転結
pub(super) async fn resolve_plan(
    state: &AppState,
    project_id: Uuid,
    req: PlanRequest,
) -> Result<ChapterPlan, ApiError> {
    let structure = match req.structure.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name
            .parse::<StoryStructure>()
            .map_err(ApplicationError::from)?,
        _ => state
            .get_plot_handler
            .handle(GetPlot { project_id })
            .await?
            .map(|plot| plot.structure)
            .unwrap_or_default(),
    };

    let plan = ChapterPlan::new(req.total_chapters, structure, req.estimated_length)
        .map_err(ApplicationError::from)?;
    Ok(plan)
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn list_chapters(
    State(state): State<Arc<AppState>>,
    ApiPath(project_id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Vec<ChapterResponse>>>, ApiError> {
    let chapters = state
        .list_chapters_handler
        .handle(ListChapters { project_id })
        .await?;
    Ok(Json(ApiResponse::success(
        chapters.into_iter().map(ChapterResponse::from).collect(),
    )))
}

pub async fn create_chapter(
    State(state): State<Arc<AppState>>,
    ApiPath(project_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<CreateChapterRequest>,
) -> Result<Json<ApiResponse<ChapterResponse>>, ApiError> {
    let plan = match req.plan {
        Some(plan) => Some(resolve_plan(&state, project_id, plan).await?),
        None => None,
    };

    let chapter = state
        .create_chapter_handler
        .handle(CreateChapter {
            project_id,
            number: req.number,
            title: req.title,
            summary: req.summary,
            structure: req.structure,
            estimated_words: req.estimated_words,
            estimated_reading_time: req.estimated_reading_time,
            plan,
        })
        .await?;

    state.event_publisher.publish_resource(
        chapter.project_id,
        ResourceKind::Chapter,
        chapter.id,
        ChangeAction::Created,
    );

    Ok(Json(ApiResponse::success(chapter.into())))
}

pub async fn update_chapter(
    State(state): State<Arc<AppState>>,
    ApiPath(chapter_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateChapterRequest>,
) -> Result<Json<ApiResponse<ChapterResponse>>, ApiError> {
    let chapter = state
        .update_chapter_handler
        .handle(UpdateChapter {
            chapter_id,
            number: req.number,
            title: req.title,
            summary: req.summary,
            structure: req.structure,
            estimated_words: req.estimated_words,
            estimated_reading_time: req.estimated_reading_time,
        })
        .await?;

    state.event_publisher.publish_resource(
        chapter.project_id,
        ResourceKind::Chapter,
        chapter.id,
        ChangeAction::Updated,
    );

    Ok(Json(ApiResponse::success(chapter.into())))
}

/// 删除章节，级联删除其分集和正文
pub async fn delete_chapter(
    State(state): State<Arc<AppState>>,
    ApiPath(chapter_id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    let chapter = state
        .delete_chapter_handler
        .handle(DeleteChapter { chapter_id })
        .await?;

    state.event_publisher.publish_resource(
        chapter.project_id,
        ResourceKind::Chapter,
        chapter.id,
        ChangeAction::Deleted,
    );

    Ok(Json(ApiResponse::success(DeletedResponse { id: chapter.id })))
}
