//! Structure Preview HTTP Handler

use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::application::queries::PreviewStructure;
use crate::application::StructurePreview;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::ApiJson;
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PreviewStructureRequest {
    pub total_chapters: i64,
    pub structure: String,
    pub estimated_length: i64,
}

/// 预览章节阶段划分与每章估算，不落库
pub async fn preview_structure(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<PreviewStructureRequest>,
) -> Result<Json<ApiResponse<StructurePreview>>, ApiError> {
    let preview = state.preview_structure_handler.handle(PreviewStructure {
        total_chapters: req.total_chapters,
        structure: req.structure,
        estimated_length: req.estimated_length,
    })?;
    Ok(Json(ApiResponse::success(preview)))
}
