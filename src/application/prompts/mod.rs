//! Prompts - 提示词模板与模型输出解析
//!
//! - templates: 根据企划当前状态拼装各步骤的提示词
//! - parser: 从模型输出中提取 JSON（容忍代码块和前后说明文字）
//! - suggestions: 各步骤的生成结果类型

mod parser;
mod suggestions;
mod templates;

pub use parser::{parse_json, parse_list, plain_text, ParseError};
pub use suggestions::{
    CharacterSuggestion, ChapterOutline, EpisodeOutline, PlotSuggestion,
};
pub use templates::{
    chapters_prompt, characters_prompt, draft_prompt, episodes_prompt, plot_prompt,
    synopsis_prompt, StoryContext, SYSTEM_PROMPT,
};
