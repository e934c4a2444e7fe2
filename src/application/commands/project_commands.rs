//! Project Commands

use uuid::Uuid;

/// 创建企划命令
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub title: String,
    pub description: String,
    pub genre: String,
}

/// 更新企划命令（None 表示不修改）
#[derive(Debug, Clone)]
pub struct UpdateProject {
    pub project_id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
}

/// 切换当前写作步骤命令
#[derive(Debug, Clone)]
pub struct SetProjectStep {
    pub project_id: Uuid,
    /// 1..=6
    pub step: i64,
}

/// 删除企划命令（级联删除全部内容）
#[derive(Debug, Clone)]
pub struct DeleteProject {
    pub project_id: Uuid,
}
