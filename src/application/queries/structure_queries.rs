//! Structure Queries

/// 预览章节结构
///
/// 参数保持原始形态，由 handler 统一校验
#[derive(Debug, Clone)]
pub struct PreviewStructure {
    pub total_chapters: i64,
    pub structure: String,
    pub estimated_length: i64,
}
