//! Project Context - 小说企划限界上下文
//!
//! 职责:
//! - 写作步骤（角色 → 情节 → 梗概 → 章节 → 分集 → 草稿）
//! - 企划标题等值对象校验

mod errors;
mod step;
mod value_objects;

pub use errors::ProjectError;
pub use step::WritingStep;
pub use value_objects::{Genre, Title};
