//! Plot / Synopsis / Draft Command Handlers

use chrono::Utc;
use std::sync::Arc;

use super::project_handlers::require_project;
use crate::application::commands::{SaveDraft, SavePlot, SaveSynopsis};
use crate::application::error::ApplicationError;
use crate::application::ports::{DraftRecord, PlotRecord, StoryRepositoryPort, SynopsisRecord};

pub struct SavePlotHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl SavePlotHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, command: SavePlot) -> Result<PlotRecord, ApplicationError> {
        require_project(self.repo.as_ref(), command.project_id).await?;

        let plot = PlotRecord {
            project_id: command.project_id,
            theme: command.theme,
            setting: command.setting,
            hook: command.hook,
            protagonist_goal: command.protagonist_goal,
            main_conflict: command.main_conflict,
            ending: command.ending,
            structure: command.structure,
            updated_at: Utc::now(),
        };

        self.repo.save_plot(&plot).await?;

        tracing::info!(
            project_id = %plot.project_id,
            structure = plot.structure.as_str(),
            "Plot saved"
        );

        Ok(plot)
    }
}

pub struct SaveSynopsisHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl SaveSynopsisHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, command: SaveSynopsis) -> Result<SynopsisRecord, ApplicationError> {
        require_project(self.repo.as_ref(), command.project_id).await?;

        let synopsis = SynopsisRecord {
            project_id: command.project_id,
            content: command.content,
            updated_at: Utc::now(),
        };

        self.repo.save_synopsis(&synopsis).await?;

        tracing::info!(
            project_id = %synopsis.project_id,
            chars = synopsis.content.chars().count(),
            "Synopsis saved"
        );

        Ok(synopsis)
    }
}

pub struct SaveDraftHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl SaveDraftHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    /// 字数按 Unicode 字符计
    pub async fn handle(&self, command: SaveDraft) -> Result<DraftRecord, ApplicationError> {
        let chapter = self
            .repo
            .find_chapter(command.chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", command.chapter_id))?;

        let draft = DraftRecord {
            chapter_id: chapter.id,
            char_count: command.content.chars().count(),
            content: command.content,
            updated_at: Utc::now(),
        };

        self.repo.save_draft(&draft).await?;

        tracing::info!(
            chapter_id = %chapter.id,
            number = chapter.number,
            char_count = draft.char_count,
            "Draft saved"
        );

        Ok(draft)
    }
}
