//! Project Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("无效的标题: {0}")]
    InvalidTitle(String),

    #[error("无效的写作步骤: {0}")]
    InvalidStep(i64),
}
