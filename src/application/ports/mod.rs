//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod llm_provider;
mod repositories;

pub use llm_provider::{
    CompletionRequest, CompletionResponse, LlmError, LlmProviderPort, LlmRegistry,
};
pub use repositories::{
    ChapterRecord, CharacterRecord, DraftRecord, EpisodeRecord, PlotRecord, ProjectRecord,
    RepositoryError, StoryRepositoryPort, SynopsisRecord,
};
