//! Project Context - Value Objects

use serde::{Deserialize, Serialize};

use super::ProjectError;

/// 企划标题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title(String);

impl Title {
    pub fn new(title: impl Into<String>) -> Result<Self, ProjectError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(ProjectError::InvalidTitle("标题不能为空".to_string()));
        }
        if title.chars().count() > 200 {
            return Err(ProjectError::InvalidTitle(
                "标题长度不能超过200字符".to_string(),
            ));
        }
        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 题材，空字符串视为未设置
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Genre(String);

impl Genre {
    pub fn new(genre: impl Into<String>) -> Self {
        Self(genre.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unset(&self) -> bool {
        self.0.is_empty()
    }

    /// 用于提示词，未设置时给出兜底描述
    pub fn describe(&self) -> &str {
        if self.is_unset() {
            "ジャンル未設定"
        } else {
            &self.0
        }
    }
}
