//! Structure Query Handlers

use serde::Serialize;

use crate::application::error::ApplicationError;
use crate::application::queries::PreviewStructure;
use crate::domain::structure::{ChapterEstimate, ChapterPlan, ChapterStructure, StoryStructure};

/// 单章在结构中的位置
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterSlot {
    pub number: u32,
    pub phase: &'static str,
}

/// 结构预览结果
#[derive(Debug, Clone, Serialize)]
pub struct StructurePreview {
    #[serde(flatten)]
    pub structure: ChapterStructure,
    pub estimate: ChapterEstimate,
    pub chapters: Vec<ChapterSlot>,
}

/// PreviewStructure Handler
///
/// 纯计算，不访问仓储
#[derive(Default)]
pub struct PreviewStructureHandler;

impl PreviewStructureHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, query: PreviewStructure) -> Result<StructurePreview, ApplicationError> {
        let structure: StoryStructure = query.structure.trim().parse()?;
        let plan = ChapterPlan::new(query.total_chapters, structure, query.estimated_length)?;

        let chapters = (1..=plan.total_chapters())
            .map(|number| ChapterSlot {
                number,
                phase: plan.phase_name_of(number),
            })
            .collect();

        Ok(StructurePreview {
            structure: plan.chapter_structure(),
            estimate: plan.chapter_estimate(),
            chapters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::structure::MAX_TOTAL_CHAPTERS;

    fn preview(total: i64, structure: &str, length: i64) -> PreviewStructure {
        PreviewStructure {
            total_chapters: total,
            structure: structure.to_string(),
            estimated_length: length,
        }
    }

    #[test]
    fn test_preview_three_act() {
        let result = PreviewStructureHandler::new()
            .handle(preview(10, "three-act", 30_000))
            .unwrap();

        let phases: Vec<&[u32]> = result
            .structure
            .phases()
            .iter()
            .map(|p| p.chapters())
            .collect();
        assert_eq!(phases[0], &[1, 2, 3]);
        assert_eq!(phases[1], &[4, 5, 6, 7, 8]);
        assert_eq!(phases[2], &[9, 10]);

        assert_eq!(result.estimate.estimated_words, 3000);
        assert_eq!(result.estimate.estimated_reading_time, 12);
        assert_eq!(result.chapters.len(), 10);
        assert_eq!(result.chapters[8].phase, "第三幕");
    }

    #[test]
    fn test_preview_rejects_invalid_input() {
        let handler = PreviewStructureHandler::new();
        for query in [
            preview(0, "kishotenketsu", 1000),
            preview(4, "kishotenketsu", 0),
            preview(-3, "three-act", 1000),
            preview(4, "hero-journey", 1000),
        ] {
            assert!(matches!(
                handler.handle(query),
                Err(ApplicationError::ValidationError(_))
            ));
        }
    }

    #[test]
    fn test_preview_rejects_oversized_total() {
        let handler = PreviewStructureHandler::new();
        let result = handler.handle(preview(4_000_000_000, "kishotenketsu", 1));
        assert!(matches!(result, Err(ApplicationError::ValidationError(_))));

        let result = handler
            .handle(preview(i64::from(MAX_TOTAL_CHAPTERS), "three-act", 1_000_000))
            .unwrap();
        assert_eq!(result.chapters.len(), MAX_TOTAL_CHAPTERS as usize);
        assert_eq!(result.chapters.last().unwrap().phase, "第三幕");
    }

    #[test]
    fn test_preview_serializes_flat() {
        let result = PreviewStructureHandler::new()
            .handle(preview(4, "kishotenketsu", 4000))
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["structure"], "kishotenketsu");
        assert_eq!(json["total_chapters"], 4);
        assert_eq!(json["phases"][0]["name"], "起");
        assert_eq!(json["chapters"][3]["phase"], "結");
    }
}
