//! Plot / Synopsis / Draft Commands
//!
//! 每个企划（或章节）只有一条记录，保存即覆盖

use uuid::Uuid;

use crate::domain::structure::StoryStructure;

#[derive(Debug, Clone)]
pub struct SavePlot {
    pub project_id: Uuid,
    pub theme: String,
    pub setting: String,
    pub hook: String,
    pub protagonist_goal: String,
    pub main_conflict: String,
    pub ending: String,
    pub structure: StoryStructure,
}

#[derive(Debug, Clone)]
pub struct SaveSynopsis {
    pub project_id: Uuid,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct SaveDraft {
    pub chapter_id: Uuid,
    pub content: String,
}
