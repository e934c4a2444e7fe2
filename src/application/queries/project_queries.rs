//! Project Queries

use uuid::Uuid;

/// 获取企划详情
#[derive(Debug, Clone)]
pub struct GetProject {
    pub project_id: Uuid,
}

/// 列出全部企划（按更新时间倒序）
#[derive(Debug, Clone)]
pub struct ListProjects;

#[derive(Debug, Clone)]
pub struct ListCharacters {
    pub project_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct GetPlot {
    pub project_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct GetSynopsis {
    pub project_id: Uuid,
}

/// 列出章节（按章节号升序）
#[derive(Debug, Clone)]
pub struct ListChapters {
    pub project_id: Uuid,
}

/// 列出分集（按编号升序）
#[derive(Debug, Clone)]
pub struct ListEpisodes {
    pub chapter_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct GetDraft {
    pub chapter_id: Uuid,
}
