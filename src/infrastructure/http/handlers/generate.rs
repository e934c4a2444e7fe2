//! Generate HTTP Handlers
//!
//! 调用大模型生成各步骤的候选内容，结果只返回给客户端，由用户确认后再保存

use axum::{extract::State, Json};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::chapters::{resolve_plan, PlanRequest};
use crate::application::commands::{
    GenerateChapters, GenerateCharacters, GenerateDraft, GenerateEpisodes, GenerateOptions,
    GeneratePlot, GenerateSynopsis,
};
use crate::application::prompts::{CharacterSuggestion, PlotSuggestion};
use crate::application::{ChapterSuggestion, EpisodeSuggestion, Generated};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiJson, ApiPath};
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

fn default_count() -> u32 {
    3
}

/// 通用生成参数
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    /// openai / gemini / ollama，缺省使用默认提供方
    pub provider: Option<String>,
    /// 用户补充的要求
    pub hint: Option<String>,
}

impl From<GenerateRequest> for GenerateOptions {
    fn from(req: GenerateRequest) -> Self {
        Self {
            provider: req.provider,
            hint: req.hint,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateCountRequest {
    pub provider: Option<String>,
    pub hint: Option<String>,
    #[serde(default = "default_count")]
    pub count: u32,
}

impl GenerateCountRequest {
    fn options(&self) -> GenerateOptions {
        GenerateOptions {
            provider: self.provider.clone(),
            hint: self.hint.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateChaptersRequest {
    pub provider: Option<String>,
    pub hint: Option<String>,
    #[serde(flatten)]
    pub plan: PlanRequest,
}

#[derive(Debug, Serialize)]
pub struct ProviderStatus {
    pub name: String,
    pub available: bool,
}

#[derive(Debug, Serialize)]
pub struct ProvidersResponse {
    pub default_provider: String,
    pub providers: Vec<ProviderStatus>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 已注册的提供方及其连通性
pub async fn list_providers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ProvidersResponse>>, ApiError> {
    let names: Vec<String> = state.llm.names().into_iter().map(String::from).collect();

    let checks = names.iter().map(|name| {
        let llm = state.llm.clone();
        async move {
            match llm.resolve(Some(name.as_str())) {
                Ok(provider) => provider.health_check().await,
                Err(_) => false,
            }
        }
    });
    let available = join_all(checks).await;

    let providers = names
        .into_iter()
        .zip(available)
        .map(|(name, available)| ProviderStatus { name, available })
        .collect();

    Ok(Json(ApiResponse::success(ProvidersResponse {
        default_provider: state.llm.default_provider().to_string(),
        providers,
    })))
}

pub async fn generate_characters(
    State(state): State<Arc<AppState>>,
    ApiPath(project_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<GenerateCountRequest>,
) -> Result<Json<ApiResponse<Generated<Vec<CharacterSuggestion>>>>, ApiError> {
    let generated = state
        .generate_characters_handler
        .handle(GenerateCharacters {
            project_id,
            count: req.count,
            options: req.options(),
        })
        .await?;
    Ok(Json(ApiResponse::success(generated)))
}

pub async fn generate_plot(
    State(state): State<Arc<AppState>>,
    ApiPath(project_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<GenerateRequest>,
) -> Result<Json<ApiResponse<Generated<PlotSuggestion>>>, ApiError> {
    let generated = state
        .generate_plot_handler
        .handle(GeneratePlot {
            project_id,
            options: req.into(),
        })
        .await?;
    Ok(Json(ApiResponse::success(generated)))
}

pub async fn generate_synopsis(
    State(state): State<Arc<AppState>>,
    ApiPath(project_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<GenerateRequest>,
) -> Result<Json<ApiResponse<Generated<String>>>, ApiError> {
    let generated = state
        .generate_synopsis_handler
        .handle(GenerateSynopsis {
            project_id,
            options: req.into(),
        })
        .await?;
    Ok(Json(ApiResponse::success(generated)))
}

pub async fn generate_chapters(
    State(state): State<Arc<AppState>>,
    ApiPath(project_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<GenerateChaptersRequest>,
) -> Result<Json<ApiResponse<Generated<Vec<ChapterSuggestion>>>>, ApiError> {
    let plan = resolve_plan(&state, project_id, req.plan).await?;

    let generated = state
        .generate_chapters_handler
        .handle(GenerateChapters {
            project_id,
            plan,
            options: GenerateOptions {
                provider: req.provider,
                hint: req.hint,
            },
        })
        .await?;
    Ok(Json(ApiResponse::success(generated)))
}

pub async fn generate_episodes(
    State(state): State<Arc<AppState>>,
    ApiPath(chapter_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<GenerateCountRequest>,
) -> Result<Json<ApiResponse<Generated<Vec<EpisodeSuggestion>>>>, ApiError> {
    let generated = state
        .generate_episodes_handler
        .handle(GenerateEpisodes {
            chapter_id,
            count: req.count,
            options: req.options(),
        })
        .await?;
    Ok(Json(ApiResponse::success(generated)))
}

pub async fn generate_draft(
    State(state): State<Arc<AppState>>,
    ApiPath(chapter_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<GenerateRequest>,
) -> Result<Json<ApiResponse<Generated<String>>>, ApiError> {
    let generated = state
        .generate_draft_handler
        .handle(GenerateDraft {
            chapter_id,
            options: req.into(),
        })
        .await?;
    Ok(Json(ApiResponse::success(generated)))
}
