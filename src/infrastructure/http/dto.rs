//! Data Transfer Objects
//!
//! 统一响应信封与各资源的响应结构，请求体定义在各自的 handler 文件中

use serde::Serialize;
use uuid::Uuid;

use crate::application::{
    ChapterRecord, CharacterRecord, DraftRecord, EpisodeRecord, PlotRecord, ProjectRecord,
    SynopsisRecord,
};
use crate::domain::structure::StoryStructure;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }

    /// 错误响应
    pub fn error(errno: i32, error: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 删除操作的响应
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub id: Uuid,
}

// ============================================================================
// Project
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub genre: String,
    /// 当前写作步骤（1..=6）
    pub current_step: u8,
    pub step_name: &'static str,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ProjectRecord> for ProjectResponse {
    fn from(record: ProjectRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            genre: record.genre,
            current_step: record.current_step.number(),
            step_name: record.current_step.as_str(),
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Character
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CharacterResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub role: String,
    pub personality: String,
    pub background: String,
    pub appearance: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CharacterRecord> for CharacterResponse {
    fn from(record: CharacterRecord) -> Self {
        Self {
            id: record.id,
            project_id: record.project_id,
            name: record.name,
            role: record.role,
            personality: record.personality,
            background: record.background,
            appearance: record.appearance,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Plot / Synopsis
// ============================================================================

#[derive(Debug, Serialize)]
pub struct PlotResponse {
    pub project_id: Uuid,
    pub theme: String,
    pub setting: String,
    pub hook: String,
    pub protagonist_goal: String,
    pub main_conflict: String,
    pub ending: String,
    pub structure: StoryStructure,
    pub updated_at: String,
}

impl From<PlotRecord> for PlotResponse {
    fn from(record: PlotRecord) -> Self {
        Self {
            project_id: record.project_id,
            theme: record.theme,
            setting: record.setting,
            hook: record.hook,
            protagonist_goal: record.protagonist_goal,
            main_conflict: record.main_conflict,
            ending: record.ending,
            structure: record.structure,
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SynopsisResponse {
    pub project_id: Uuid,
    pub content: String,
    pub updated_at: String,
}

impl From<SynopsisRecord> for SynopsisResponse {
    fn from(record: SynopsisRecord) -> Self {
        Self {
            project_id: record.project_id,
            content: record.content,
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Chapter / Episode / Draft
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ChapterResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub number: u32,
    pub title: String,
    pub summary: String,
    /// 所属阶段名（起 / 承 / 第一幕 ...）
    pub structure: String,
    pub estimated_words: u32,
    pub estimated_reading_time: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ChapterRecord> for ChapterResponse {
    fn from(record: ChapterRecord) -> Self {
        Self {
            id: record.id,
            project_id: record.project_id,
            number: record.number,
            title: record.title,
            summary: record.summary,
            structure: record.structure,
            estimated_words: record.estimated_words,
            estimated_reading_time: record.estimated_reading_time,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EpisodeResponse {
    pub id: Uuid,
    pub chapter_id: Uuid,
    pub number: u32,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<EpisodeRecord> for EpisodeResponse {
    fn from(record: EpisodeRecord) -> Self {
        Self {
            id: record.id,
            chapter_id: record.chapter_id,
            number: record.number,
            title: record.title,
            summary: record.summary,
            content: record.content,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub chapter_id: Uuid,
    pub content: String,
    pub char_count: usize,
    pub updated_at: String,
}

impl From<DraftRecord> for DraftResponse {
    fn from(record: DraftRecord) -> Self {
        Self {
            chapter_id: record.chapter_id,
            content: record.content,
            char_count: record.char_count,
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}
