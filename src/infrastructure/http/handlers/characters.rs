//! Character HTTP Handlers

use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{
    CharacterFields, CreateCharacter, DeleteCharacter, UpdateCharacter,
};
use crate::application::queries::ListCharacters;
use crate::infrastructure::events::{ChangeAction, ResourceKind};
use crate::infrastructure::http::dto::{ApiResponse, CharacterResponse, DeletedResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiJson, ApiPath};
use crate::infrastructure::http::state::AppState;

/// 角色请求体（创建与更新共用，更新为整体替换）
#[derive(Debug, Deserialize)]
pub struct CharacterRequest {
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub personality: String,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub appearance: String,
}

impl From<CharacterRequest> for CharacterFields {
    fn from(req: CharacterRequest) -> Self {
        Self {
            name: req.name,
            role: req.role,
            personality: req.personality,
            background: req.background,
            appearance: req.appearance,
        }
    }
}

pub async fn list_characters(
    State(state): State<Arc<AppState>>,
    ApiPath(project_id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Vec<CharacterResponse>>>, ApiError> {
    let characters = state
        .list_characters_handler
        .handle(ListCharacters { project_id })
        .await?;
    Ok(Json(ApiResponse::success(
        characters.into_iter().map(CharacterResponse::from).collect(),
    )))
}

pub async fn create_character(
    State(state): State<Arc<AppState>>,
    ApiPath(project_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<CharacterRequest>,
) -> Result<Json<ApiResponse<CharacterResponse>>, ApiError> {
    let character = state
        .create_character_handler
        .handle(CreateCharacter {
            project_id,
            fields: req.into(),
        })
        .await?;

    state.event_publisher.publish_resource(
        character.project_id,
        ResourceKind::Character,
        character.id,
        ChangeAction::Created,
    );

    Ok(Json(ApiResponse::success(character.into())))
}

pub async fn update_character(
    State(state): State<Arc<AppState>>,
    ApiPath(character_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<CharacterRequest>,
) -> Result<Json<ApiResponse<CharacterResponse>>, ApiError> {
    let character = state
        .update_character_handler
        .handle(UpdateCharacter {
            character_id,
            fields: req.into(),
        })
        .await?;

    state.event_publisher.publish_resource(
        character.project_id,
        ResourceKind::Character,
        character.id,
        ChangeAction::Updated,
    );

    Ok(Json(ApiResponse::success(character.into())))
}

pub async fn delete_character(
    State(state): State<Arc<AppState>>,
    ApiPath(character_id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    let character = state
        .delete_character_handler
        .handle(DeleteCharacter { character_id })
        .await?;

    state.event_publisher.publish_resource(
        character.project_id,
        ResourceKind::Character,
        character.id,
        ChangeAction::Deleted,
    );

    Ok(Json(ApiResponse::success(DeletedResponse { id: character.id })))
}
