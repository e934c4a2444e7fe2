//! Project HTTP Handlers

use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{CreateProject, DeleteProject, SetProjectStep, UpdateProject};
use crate::application::queries::{GetProject, ListProjects};
use crate::infrastructure::events::ChangeAction;
use crate::infrastructure::http::dto::{ApiResponse, DeletedResponse, ProjectResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiJson, ApiPath};
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub genre: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetStepRequest {
    pub step: i64,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn list_projects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ProjectResponse>>>, ApiError> {
    let projects = state.list_projects_handler.handle(ListProjects).await?;
    Ok(Json(ApiResponse::success(
        projects.into_iter().map(ProjectResponse::from).collect(),
    )))
}

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateProjectRequest>,
) -> Result<Json<ApiResponse<ProjectResponse>>, ApiError> {
    let project = state
        .create_project_handler
        .handle(CreateProject {
            title: req.title,
            description: req.description,
            genre: req.genre,
        })
        .await?;

    state
        .event_publisher
        .publish_project(project.id, ChangeAction::Created);

    Ok(Json(ApiResponse::success(project.into())))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    ApiPath(project_id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<ProjectResponse>>, ApiError> {
    let project = state
        .get_project_handler
        .handle(GetProject { project_id })
        .await?;
    Ok(Json(ApiResponse::success(project.into())))
}

pub async fn update_project(
    State(state): State<Arc<AppState>>,
    ApiPath(project_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateProjectRequest>,
) -> Result<Json<ApiResponse<ProjectResponse>>, ApiError> {
    let project = state
        .update_project_handler
        .handle(UpdateProject {
            project_id,
            title: req.title,
            description: req.description,
            genre: req.genre,
        })
        .await?;

    state
        .event_publisher
        .publish_project(project.id, ChangeAction::Updated);

    Ok(Json(ApiResponse::success(project.into())))
}

/// 切换当前写作步骤（1..=6）
pub async fn set_project_step(
    State(state): State<Arc<AppState>>,
    ApiPath(project_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<SetStepRequest>,
) -> Result<Json<ApiResponse<ProjectResponse>>, ApiError> {
    let project = state
        .set_project_step_handler
        .handle(SetProjectStep {
            project_id,
            step: req.step,
        })
        .await?;

    state
        .event_publisher
        .publish_project(project.id, ChangeAction::Updated);

    Ok(Json(ApiResponse::success(project.into())))
}

/// 删除企划，级联删除全部下属数据
pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    ApiPath(project_id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    state
        .delete_project_handler
        .handle(DeleteProject { project_id })
        .await?;

    state
        .event_publisher
        .publish_project(project_id, ChangeAction::Deleted);

    Ok(Json(ApiResponse::success(DeletedResponse { id: project_id })))
}
