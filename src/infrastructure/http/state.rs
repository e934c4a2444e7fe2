//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::commands::handlers::{
    CreateChapterHandler, CreateCharacterHandler, CreateEpisodeHandler, CreateProjectHandler,
    DeleteChapterHandler, DeleteCharacterHandler, DeleteEpisodeHandler, DeleteProjectHandler,
    GenerateChaptersHandler, GenerateCharactersHandler, GenerateDraftHandler,
    GenerateEpisodesHandler, GeneratePlotHandler, GenerateSynopsisHandler, SaveDraftHandler,
    SavePlotHandler, SaveSynopsisHandler, SetProjectStepHandler, UpdateChapterHandler,
    UpdateCharacterHandler, UpdateEpisodeHandler, UpdateProjectHandler,
};
use crate::application::queries::handlers::{
    GetDraftHandler, GetPlotHandler, GetProjectHandler, GetSynopsisHandler, ListChaptersHandler,
    ListCharactersHandler, ListEpisodesHandler, ListProjectsHandler, PreviewStructureHandler,
};
use crate::application::{LlmRegistry, StoryRepositoryPort};
use crate::infrastructure::events::EventPublisher;

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub repo: Arc<dyn StoryRepositoryPort>,
    pub llm: Arc<LlmRegistry>,
    pub event_publisher: Arc<EventPublisher>,
    /// 存储后端名称（ping 时返回）
    pub storage: &'static str,

    // ========== Command Handlers ==========
    pub create_project_handler: CreateProjectHandler,
    pub update_project_handler: UpdateProjectHandler,
    pub set_project_step_handler: SetProjectStepHandler,
    pub delete_project_handler: DeleteProjectHandler,
    pub create_character_handler: CreateCharacterHandler,
    pub update_character_handler: UpdateCharacterHandler,
    pub delete_character_handler: DeleteCharacterHandler,
    pub save_plot_handler: SavePlotHandler,
    pub save_synopsis_handler: SaveSynopsisHandler,
    pub create_chapter_handler: CreateChapterHandler,
    pub update_chapter_handler: UpdateChapterHandler,
    pub delete_chapter_handler: DeleteChapterHandler,
    pub create_episode_handler: CreateEpisodeHandler,
    pub update_episode_handler: UpdateEpisodeHandler,
    pub delete_episode_handler: DeleteEpisodeHandler,
    pub save_draft_handler: SaveDraftHandler,

    // ========== Generate Handlers ==========
    pub generate_characters_handler: GenerateCharactersHandler,
    pub generate_plot_handler: GeneratePlotHandler,
    pub generate_synopsis_handler: GenerateSynopsisHandler,
    pub generate_chapters_handler: GenerateChaptersHandler,
    pub generate_episodes_handler: GenerateEpisodesHandler,
    pub generate_draft_handler: GenerateDraftHandler,

    // ========== Query Handlers ==========
    pub get_project_handler: GetProjectHandler,
    pub list_projects_handler: ListProjectsHandler,
    pub list_characters_handler: ListCharactersHandler,
    pub get_plot_handler: GetPlotHandler,
    pub get_synopsis_handler: GetSynopsisHandler,
    pub list_chapters_handler: ListChaptersHandler,
    pub list_episodes_handler: ListEpisodesHandler,
    pub get_draft_handler: GetDraftHandler,
    pub preview_structure_handler: PreviewStructureHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        repo: Arc<dyn StoryRepositoryPort>,
        llm: Arc<LlmRegistry>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            // Ports
            repo: repo.clone(),
            llm: llm.clone(),
            event_publisher,
            storage: "memory",

            // Command handlers
            create_project_handler: CreateProjectHandler::new(repo.clone()),
            update_project_handler: UpdateProjectHandler::new(repo.clone()),
            set_project_step_handler: SetProjectStepHandler::new(repo.clone()),
            delete_project_handler: DeleteProjectHandler::new(repo.clone()),
            create_character_handler: CreateCharacterHandler::new(repo.clone()),
            update_character_handler: UpdateCharacterHandler::new(repo.clone()),
            delete_character_handler: DeleteCharacterHandler::new(repo.clone()),
            save_plot_handler: SavePlotHandler::new(repo.clone()),
            save_synopsis_handler: SaveSynopsisHandler::new(repo.clone()),
            create_chapter_handler: CreateChapterHandler::new(repo.clone()),
            update_chapter_handler: UpdateChapterHandler::new(repo.clone()),
            delete_chapter_handler: DeleteChapterHandler::new(repo.clone()),
            create_episode_handler: CreateEpisodeHandler::new(repo.clone()),
            update_episode_handler: UpdateEpisodeHandler::new(repo.clone()),
            delete_episode_handler: DeleteEpisodeHandler::new(repo.clone()),
            save_draft_handler: SaveDraftHandler::new(repo.clone()),

            // Generate handlers
            generate_characters_handler: GenerateCharactersHandler::new(repo.clone(), llm.clone()),
            generate_plot_handler: GeneratePlotHandler::new(repo.clone(), llm.clone()),
            generate_synopsis_handler: GenerateSynopsisHandler::new(repo.clone(), llm.clone()),
            generate_chapters_handler: GenerateChaptersHandler::new(repo.clone(), llm.clone()),
            generate_episodes_handler: GenerateEpisodesHandler::new(repo.clone(), llm.clone()),
            generate_draft_handler: GenerateDraftHandler::new(repo.clone(), llm),

            // Query handlers
            get_project_handler: GetProjectHandler::new(repo.clone()),
            list_projects_handler: ListProjectsHandler::new(repo.clone()),
            list_characters_handler: ListCharactersHandler::new(repo.clone()),
            get_plot_handler: GetPlotHandler::new(repo.clone()),
            get_synopsis_handler: GetSynopsisHandler::new(repo.clone()),
            list_chapters_handler: ListChaptersHandler::new(repo.clone()),
            list_episodes_handler: ListEpisodesHandler::new(repo.clone()),
            get_draft_handler: GetDraftHandler::new(repo),
            preview_structure_handler: PreviewStructureHandler::new(),
        }
    }

    /// 标记存储后端
    pub fn with_storage(mut self, storage: &'static str) -> Self {
        self.storage = storage;
        self
    }
}
