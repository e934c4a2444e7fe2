//! Structure Context - Errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("无效的参数: {0}")]
    InvalidArgument(String),

    #[error("未知的结构类型: {0}")]
    UnknownStructure(String),
}
