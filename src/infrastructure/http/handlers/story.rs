//! Plot / Synopsis HTTP Handlers
//!
//! 每个企划各一份，保存即覆盖；尚未保存时 data 为 null

use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{SavePlot, SaveSynopsis};
use crate::application::queries::{GetPlot, GetSynopsis};
use crate::domain::structure::StoryStructure;
use crate::infrastructure::events::{ChangeAction, ResourceKind};
use crate::infrastructure::http::dto::{ApiResponse, PlotResponse, SynopsisResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiJson, ApiPath};
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SavePlotRequest {
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub setting: String,
    #[serde(default)]
    pub hook: String,
    #[serde(default)]
    pub protagonist_goal: String,
    #[serde(default)]
    pub main_conflict: String,
    #[serde(default)]
    pub ending: String,
    /// kishotenketsu / three-act，缺省为 kishotenketsu
    #[serde(default)]
    pub structure: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveSynopsisRequest {
    pub content: String,
}

pub async fn get_plot(
    State(state): State<Arc<AppState>>,
    ApiPath(project_id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Option<PlotResponse>>>, ApiError> {
    let plot = state.get_plot_handler.handle(GetPlot { project_id }).await?;
    Ok(Json(ApiResponse::success(plot.map(PlotResponse::from))))
}

pub async fn save_plot(
    State(state): State<Arc<AppState>>,
    ApiPath(project_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<SavePlotRequest>,
) -> Result<Json<ApiResponse<PlotResponse>>, ApiError> {
    let structure = match req.structure.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name
            .parse::<StoryStructure>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        _ => StoryStructure::default(),
    };

    let plot = state
        .save_plot_handler
        .handle(SavePlot {
            project_id,
            theme: req.theme,
            setting: req.setting,
            hook: req.hook,
            protagonist_goal: req.protagonist_goal,
            main_conflict: req.main_conflict,
            ending: req.ending,
            structure,
        })
        .await?;

    state.event_publisher.publish_resource(
        project_id,
        ResourceKind::Plot,
        project_id,
        ChangeAction::Updated,
    );

    Ok(Json(ApiResponse::success(plot.into())))
}

pub async fn get_synopsis(
    State(state): State<Arc<AppState>>,
    ApiPath(project_id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Option<SynopsisResponse>>>, ApiError> {
    let synopsis = state
        .get_synopsis_handler
        .handle(GetSynopsis { project_id })
        .await?;
    Ok(Json(ApiResponse::success(synopsis.map(SynopsisResponse::from))))
}

pub async fn save_synopsis(
    State(state): State<Arc<AppState>>,
    ApiPath(project_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<SaveSynopsisRequest>,
) -> Result<Json<ApiResponse<SynopsisResponse>>, ApiError> {
    let synopsis = state
        .save_synopsis_handler
        .handle(SaveSynopsis {
            project_id,
            content: req.content,
        })
        .await?;

    state.event_publisher.publish_resource(
        project_id,
        ResourceKind::Synopsis,
        project_id,
        ChangeAction::Updated,
    );

    Ok(Json(ApiResponse::success(synopsis.into())))
}
