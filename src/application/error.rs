//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::{LlmError, RepositoryError};
use crate::application::prompts::ParseError;
use crate::domain::project::ProjectError;
use crate::domain::structure::StructureError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: Uuid,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 业务规则违反
    #[error("Business rule violation: {0}")]
    BusinessRuleViolation(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 外部服务错误（LLM）
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: Uuid) -> Self {
        Self::NotFound { resource_type, id }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建业务规则违反错误
    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::BusinessRuleViolation(message.into())
    }

    /// 创建外部服务错误
    pub fn external(message: impl Into<String>) -> Self {
        Self::ExternalServiceError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate(message) => Self::BusinessRuleViolation(message),
            other => Self::RepositoryError(other.to_string()),
        }
    }
}

impl From<StructureError> for ApplicationError {
    fn from(err: StructureError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<ProjectError> for ApplicationError {
    fn from(err: ProjectError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<LlmError> for ApplicationError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::NotConfigured(name) => {
                Self::ValidationError(format!("LLM provider not available: {}", name))
            }
            other => Self::ExternalServiceError(other.to_string()),
        }
    }
}

impl From<ParseError> for ApplicationError {
    fn from(err: ParseError) -> Self {
        Self::ExternalServiceError(format!("Unusable model output: {}", err))
    }
}
