//! Episode / Draft HTTP Handlers

use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::publish_chapter_resource;
use crate::application::commands::{CreateEpisode, DeleteEpisode, SaveDraft, UpdateEpisode};
use crate::application::queries::{GetDraft, ListEpisodes};
use crate::infrastructure::events::{ChangeAction, ResourceKind};
use crate::infrastructure::http::dto::{
    ApiResponse, DeletedResponse, DraftResponse, EpisodeResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiJson, ApiPath};
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateEpisodeRequest {
    pub number: Option<u32>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEpisodeRequest {
    pub number: Option<u32>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveDraftRequest {
    pub content: String,
}

pub async fn list_episodes(
    State(state): State<Arc<AppState>>,
    ApiPath(chapter_id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Vec<EpisodeResponse>>>, ApiError> {
    let episodes = state
        .list_episodes_handler
        .handle(ListEpisodes { chapter_id })
        .await?;
    Ok(Json(ApiResponse::success(
        episodes.into_iter().map(EpisodeResponse::from).collect(),
    )))
}

pub async fn create_episode(
    State(state): State<Arc<AppState>>,
    ApiPath(chapter_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<CreateEpisodeRequest>,
) -> Result<Json<ApiResponse<EpisodeResponse>>, ApiError> {
    let episode = state
        .create_episode_handler
        .handle(CreateEpisode {
            chapter_id,
            number: req.number,
            title: req.title,
            summary: req.summary,
            content: req.content,
        })
        .await?;

    publish_chapter_resource(
        &state,
        episode.chapter_id,
        ResourceKind::Episode,
        episode.id,
        ChangeAction::Created,
    )
    .await;

    Ok(Json(ApiResponse::success(episode.into())))
}

pub async fn update_episode(
    State(state): State<Arc<AppState>>,
    ApiPath(episode_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateEpisodeRequest>,
) -> Result<Json<ApiResponse<EpisodeResponse>>, ApiError> {
    let episode = state
        .update_episode_handler
        .handle(UpdateEpisode {
            episode_id,
            number: req.number,
            title: req.title,
            summary: req.summary,
            content: req.content,
        })
        .await?;

    publish_chapter_resource(
        &state,
        episode.chapter_id,
        ResourceKind::Episode,
        episode.id,
        ChangeAction::Updated,
    )
    .await;

    Ok(Json(ApiResponse::success(episode.into())))
}

pub async fn delete_episode(
    State(state): State<Arc<AppState>>,
    ApiPath(episode_id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    let episode = state
        .delete_episode_handler
        .handle(DeleteEpisode { episode_id })
        .await?;

    publish_chapter_resource(
        &state,
        episode.chapter_id,
        ResourceKind::Episode,
        episode.id,
        ChangeAction::Deleted,
    )
    .await;

    Ok(Json(ApiResponse::success(DeletedResponse { id: episode.id })))
}

pub async fn get_draft(
    State(state): State<Arc<AppState>>,
    ApiPath(chapter_id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Option<DraftResponse>>>, ApiError> {
    let draft = state.get_draft_handler.handle(GetDraft { chapter_id }).await?;
    Ok(Json(ApiResponse::success(draft.map(DraftResponse::from))))
}

pub async fn save_draft(
    State(state): State<Arc<AppState>>,
    ApiPath(chapter_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<SaveDraftRequest>,
) -> Result<Json<ApiResponse<DraftResponse>>, ApiError> {
    let draft = state
        .save_draft_handler
        .handle(SaveDraft {
            chapter_id,
            content: req.content,
        })
        .await?;

    publish_chapter_resource(
        &state,
        chapter_id,
        ResourceKind::Draft,
        chapter_id,
        ChangeAction::Updated,
    )
    .await;

    Ok(Json(ApiResponse::success(draft.into())))
}
