//! Chapter Commands

use uuid::Uuid;

use crate::domain::structure::ChapterPlan;

/// 创建章节命令
///
/// 未给出的字段按以下规则补默认值:
/// - number: 现有最大编号 + 1
/// - structure: 有 plan 时取 plan 中该章所属阶段，否则为 unclassified
/// - estimated_*: 有 plan 时按 plan 估算，否则为 0
#[derive(Debug, Clone)]
pub struct CreateChapter {
    pub project_id: Uuid,
    pub number: Option<u32>,
    pub title: String,
    pub summary: String,
    pub structure: Option<String>,
    pub estimated_words: Option<u32>,
    pub estimated_reading_time: Option<u32>,
    pub plan: Option<ChapterPlan>,
}

/// 更新章节命令（None 表示不修改）
#[derive(Debug, Clone)]
pub struct UpdateChapter {
    pub chapter_id: Uuid,
    pub number: Option<u32>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub structure: Option<String>,
    pub estimated_words: Option<u32>,
    pub estimated_reading_time: Option<u32>,
}

/// 删除章节命令（级联删除分集和草稿）
#[derive(Debug, Clone)]
pub struct DeleteChapter {
    pub chapter_id: Uuid,
}
