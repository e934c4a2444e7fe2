//! Generate Commands - 调用 LLM 生成建议（结果不落库）

use uuid::Uuid;

use crate::domain::structure::ChapterPlan;

/// 生成通用选项
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// 指定提供方（openai / gemini / ollama），None 使用默认
    pub provider: Option<String>,
    /// 作者的额外要求
    pub hint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GenerateCharacters {
    pub project_id: Uuid,
    pub count: u32,
    pub options: GenerateOptions,
}

#[derive(Debug, Clone)]
pub struct GeneratePlot {
    pub project_id: Uuid,
    pub options: GenerateOptions,
}

#[derive(Debug, Clone)]
pub struct GenerateSynopsis {
    pub project_id: Uuid,
    pub options: GenerateOptions,
}

#[derive(Debug, Clone)]
pub struct GenerateChapters {
    pub project_id: Uuid,
    pub plan: ChapterPlan,
    pub options: GenerateOptions,
}

#[derive(Debug, Clone)]
pub struct GenerateEpisodes {
    pub chapter_id: Uuid,
    pub count: u32,
    pub options: GenerateOptions,
}

#[derive(Debug, Clone)]
pub struct GenerateDraft {
    pub chapter_id: Uuid,
    pub options: GenerateOptions,
}
