//! Project Query Handlers
//!
//! 子资源查询先确认父资源存在，父资源不存在时返回 NotFound，
//! 父资源存在但尚未保存内容时返回空列表或 None。

use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    ChapterRecord, CharacterRecord, DraftRecord, EpisodeRecord, PlotRecord, ProjectRecord,
    StoryRepositoryPort, SynopsisRecord,
};
use crate::application::queries::{
    GetDraft, GetPlot, GetProject, GetSynopsis, ListChapters, ListCharacters, ListEpisodes,
    ListProjects,
};

async fn ensure_project(
    repo: &dyn StoryRepositoryPort,
    project_id: Uuid,
) -> Result<ProjectRecord, ApplicationError> {
    repo.find_project(project_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Project", project_id))
}

async fn ensure_chapter(
    repo: &dyn StoryRepositoryPort,
    chapter_id: Uuid,
) -> Result<ChapterRecord, ApplicationError> {
    repo.find_chapter(chapter_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Chapter", chapter_id))
}

/// GetProject Handler
pub struct GetProjectHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl GetProjectHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, query: GetProject) -> Result<ProjectRecord, ApplicationError> {
        ensure_project(self.repo.as_ref(), query.project_id).await
    }
}

/// ListProjects Handler
pub struct ListProjectsHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl ListProjectsHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, _query: ListProjects) -> Result<Vec<ProjectRecord>, ApplicationError> {
        Ok(self.repo.find_all_projects().await?)
    }
}

/// ListCharacters Handler
pub struct ListCharactersHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl ListCharactersHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    pub async fn handle(
        &self,
        query: ListCharacters,
    ) -> Result<Vec<CharacterRecord>, ApplicationError> {
        ensure_project(self.repo.as_ref(), query.project_id).await?;
        Ok(self.repo.find_characters(query.project_id).await?)
    }
}

/// GetPlot Handler
pub struct GetPlotHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl GetPlotHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, query: GetPlot) -> Result<Option<PlotRecord>, ApplicationError> {
        ensure_project(self.repo.as_ref(), query.project_id).await?;
        Ok(self.repo.find_plot(query.project_id).await?)
    }
}

/// GetSynopsis Handler
pub struct GetSynopsisHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl GetSynopsisHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    pub async fn handle(
        &self,
        query: GetSynopsis,
    ) -> Result<Option<SynopsisRecord>, ApplicationError> {
        ensure_project(self.repo.as_ref(), query.project_id).await?;
        Ok(self.repo.find_synopsis(query.project_id).await?)
    }
}

/// ListChapters Handler
pub struct ListChaptersHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl ListChaptersHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, query: ListChapters) -> Result<Vec<ChapterRecord>, ApplicationError> {
        ensure_project(self.repo.as_ref(), query.project_id).await?;
        Ok(self.repo.find_chapters(query.project_id).await?)
    }
}

/// ListEpisodes Handler
pub struct ListEpisodesHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl ListEpisodesHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, query: ListEpisodes) -> Result<Vec<EpisodeRecord>, ApplicationError> {
        ensure_chapter(self.repo.as_ref(), query.chapter_id).await?;
        Ok(self.repo.find_episodes(query.chapter_id).await?)
    }
}

/// GetDraft Handler
pub struct GetDraftHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl GetDraftHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, query: GetDraft) -> Result<Option<DraftRecord>, ApplicationError> {
        ensure_chapter(self.repo.as_ref(), query.chapter_id).await?;
        Ok(self.repo.find_draft(query.chapter_id).await?)
    }
}
