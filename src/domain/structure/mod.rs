//! Structure Context - 章节结构限界上下文
//!
//! 职责:
//! - 按叙事结构（起承転結 / 三幕构成）把章节数划分为若干阶段
//! - 章节所属阶段查询
//! - 每章默认字数与阅读时长估算
//!
//! 纯计算，无 I/O，无共享状态

mod errors;
mod partition;
mod plan;
mod value_objects;

pub use errors::StructureError;
pub use partition::{ChapterStructure, Phase, UNCLASSIFIED};
pub use plan::{
    estimate_chapter, reading_minutes, ChapterEstimate, ChapterPlan, MAX_TOTAL_CHAPTERS,
    READING_CHARS_PER_MINUTE,
};
pub use value_objects::StoryStructure;
