//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（内存 / SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::project::WritingStep;
use crate::domain::structure::StoryStructure;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Records
// ============================================================================

/// 企划实体（用于持久化）
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub genre: String,
    pub current_step: WritingStep,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 角色实体
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterRecord {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub role: String,
    pub personality: String,
    pub background: String,
    pub appearance: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 情节实体（每个企划一条）
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRecord {
    pub project_id: Uuid,
    pub theme: String,
    pub setting: String,
    pub hook: String,
    pub protagonist_goal: String,
    pub main_conflict: String,
    pub ending: String,
    pub structure: StoryStructure,
    pub updated_at: DateTime<Utc>,
}

/// 梗概实体（每个企划一条）
#[derive(Debug, Clone, PartialEq)]
pub struct SynopsisRecord {
    pub project_id: Uuid,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

/// 章节实体
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterRecord {
    pub id: Uuid,
    pub project_id: Uuid,
    /// 章节编号（从 1 开始）
    pub number: u32,
    pub title: String,
    pub summary: String,
    /// 所属阶段名（如「起」「第二幕」）
    pub structure: String,
    pub estimated_words: u32,
    /// 阅读时长（分钟）
    pub estimated_reading_time: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 分集实体（章节下的场景单元）
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRecord {
    pub id: Uuid,
    pub chapter_id: Uuid,
    pub number: u32,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 草稿实体（每个章节一条）
#[derive(Debug, Clone, PartialEq)]
pub struct DraftRecord {
    pub chapter_id: Uuid,
    pub content: String,
    pub char_count: usize,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Story Repository
// ============================================================================

/// Story Repository Port
///
/// 所有后端（内存 / SQLite）实现同一接口。
///
/// 约定:
/// - save_* 为 upsert
/// - delete_* 对不存在的记录返回 Ok
/// - 删除企划级联删除全部子记录，删除章节级联删除分集和草稿
#[async_trait]
pub trait StoryRepositoryPort: Send + Sync {
    // ---------- Project ----------

    async fn save_project(&self, project: &ProjectRecord) -> Result<(), RepositoryError>;

    async fn find_project(&self, id: Uuid) -> Result<Option<ProjectRecord>, RepositoryError>;

    /// 按更新时间倒序
    async fn find_all_projects(&self) -> Result<Vec<ProjectRecord>, RepositoryError>;

    async fn delete_project(&self, id: Uuid) -> Result<(), RepositoryError>;

    // ---------- Character ----------

    async fn save_character(&self, character: &CharacterRecord) -> Result<(), RepositoryError>;

    async fn find_character(&self, id: Uuid) -> Result<Option<CharacterRecord>, RepositoryError>;

    /// 按创建时间升序
    async fn find_characters(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<CharacterRecord>, RepositoryError>;

    async fn delete_character(&self, id: Uuid) -> Result<(), RepositoryError>;

    // ---------- Plot / Synopsis ----------

    async fn save_plot(&self, plot: &PlotRecord) -> Result<(), RepositoryError>;

    async fn find_plot(&self, project_id: Uuid) -> Result<Option<PlotRecord>, RepositoryError>;

    async fn save_synopsis(&self, synopsis: &SynopsisRecord) -> Result<(), RepositoryError>;

    async fn find_synopsis(
        &self,
        project_id: Uuid,
    ) -> Result<Option<SynopsisRecord>, RepositoryError>;

    // ---------- Chapter ----------

    async fn save_chapter(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError>;

    async fn find_chapter(&self, id: Uuid) -> Result<Option<ChapterRecord>, RepositoryError>;

    /// 按章节编号升序
    async fn find_chapters(&self, project_id: Uuid) -> Result<Vec<ChapterRecord>, RepositoryError>;

    async fn delete_chapter(&self, id: Uuid) -> Result<(), RepositoryError>;

    // ---------- Episode ----------

    async fn save_episode(&self, episode: &EpisodeRecord) -> Result<(), RepositoryError>;

    async fn find_episode(&self, id: Uuid) -> Result<Option<EpisodeRecord>, RepositoryError>;

    /// 按分集编号升序
    async fn find_episodes(&self, chapter_id: Uuid) -> Result<Vec<EpisodeRecord>, RepositoryError>;

    async fn delete_episode(&self, id: Uuid) -> Result<(), RepositoryError>;

    // ---------- Draft ----------

    async fn save_draft(&self, draft: &DraftRecord) -> Result<(), RepositoryError>;

    async fn find_draft(&self, chapter_id: Uuid) -> Result<Option<DraftRecord>, RepositoryError>;
}
