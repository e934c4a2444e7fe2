//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Project Context: 小说企划（项目、写作步骤）
//! - Structure Context: 章节结构划分（起承転結 / 三幕构成）

pub mod project;
pub mod structure;
