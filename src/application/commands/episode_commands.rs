//! Episode Commands

use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateEpisode {
    pub chapter_id: Uuid,
    /// 缺省为现有最大编号 + 1
    pub number: Option<u32>,
    pub title: String,
    pub summary: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct UpdateEpisode {
    pub episode_id: Uuid,
    pub number: Option<u32>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DeleteEpisode {
    pub episode_id: Uuid,
}
