//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（StoryRepository、LlmProvider）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - prompts: 提示词模板与模型输出解析
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod prompts;
pub mod queries;

// Re-exports
pub use commands::handlers::{
    ChapterSuggestion, EpisodeSuggestion, Generated, MAX_GENERATE_COUNT,
};

pub use error::ApplicationError;

pub use ports::{
    // LLM
    CompletionRequest,
    CompletionResponse,
    LlmError,
    LlmProviderPort,
    LlmRegistry,
    // Repositories
    ChapterRecord,
    CharacterRecord,
    DraftRecord,
    EpisodeRecord,
    PlotRecord,
    ProjectRecord,
    RepositoryError,
    StoryRepositoryPort,
    SynopsisRecord,
};

pub use queries::handlers::{ChapterSlot, StructurePreview};
