//! Structure Context - 章节计划

use serde::Serialize;

use super::partition::phase_name_for;
use super::{ChapterStructure, StoryStructure, StructureError};

/// 阅读速度（字/分钟）
pub const READING_CHARS_PER_MINUTE: u32 = 250;

/// 章节计划允许的最大章节数
pub const MAX_TOTAL_CHAPTERS: u32 = 10_000;

/// 每章默认估算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChapterEstimate {
    /// 每章字数 = ceil(全文字数 / 章节数)
    pub estimated_words: u32,
    /// 阅读时长（分钟）= ceil(每章字数 / 250)
    pub estimated_reading_time: u32,
}

/// 计算每章默认估算
pub fn estimate_chapter(
    estimated_length: u64,
    total_chapters: u64,
) -> Result<ChapterEstimate, StructureError> {
    if total_chapters == 0 {
        return Err(StructureError::InvalidArgument(
            "章节数必须大于 0".to_string(),
        ));
    }

    Ok(estimate(estimated_length, total_chapters))
}

/// 阅读时长（分钟）= ceil(字数 / 250)
pub fn reading_minutes(chars: u32) -> u32 {
    chars.div_ceil(READING_CHARS_PER_MINUTE)
}

// total_chapters 由调用方保证非 0
fn estimate(estimated_length: u64, total_chapters: u64) -> ChapterEstimate {
    let words = clamp_u32(estimated_length.div_ceil(total_chapters));

    ChapterEstimate {
        estimated_words: words,
        estimated_reading_time: reading_minutes(words),
    }
}

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// 章节计划（临时值，不持久化）
///
/// 不变量:
/// - 1 <= total_chapters <= MAX_TOTAL_CHAPTERS
/// - estimated_length >= 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChapterPlan {
    total_chapters: u32,
    structure: StoryStructure,
    estimated_length: u32,
}

impl ChapterPlan {
    pub fn new(
        total_chapters: i64,
        structure: StoryStructure,
        estimated_length: i64,
    ) -> Result<Self, StructureError> {
        let total_chapters = u32::try_from(total_chapters)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| {
                StructureError::InvalidArgument(format!(
                    "totalChapters 必须为正整数: {}",
                    total_chapters
                ))
            })?;
        if total_chapters > MAX_TOTAL_CHAPTERS {
            return Err(StructureError::InvalidArgument(format!(
                "totalChapters 不能超过 {}: {}",
                MAX_TOTAL_CHAPTERS, total_chapters
            )));
        }
        let estimated_length = u32::try_from(estimated_length)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| {
                StructureError::InvalidArgument(format!(
                    "estimatedLength 必须为正整数: {}",
                    estimated_length
                ))
            })?;

        Ok(Self {
            total_chapters,
            structure,
            estimated_length,
        })
    }

    pub fn total_chapters(&self) -> u32 {
        self.total_chapters
    }

    pub fn structure(&self) -> StoryStructure {
        self.structure
    }

    pub fn estimated_length(&self) -> u32 {
        self.estimated_length
    }

    /// 阶段划分
    pub fn chapter_structure(&self) -> ChapterStructure {
        ChapterStructure::compute(self.structure, self.total_chapters)
    }

    /// 单章所属阶段名，不展开完整划分
    pub fn phase_name_of(&self, chapter: u32) -> &'static str {
        phase_name_for(self.structure, self.total_chapters, chapter)
    }

    /// 每章默认估算
    pub fn chapter_estimate(&self) -> ChapterEstimate {
        estimate(
            u64::from(self.estimated_length),
            u64::from(self.total_chapters),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_estimate() {
        let plan = ChapterPlan::new(20, StoryStructure::Kishotenketsu, 50_000).unwrap();
        let estimate = plan.chapter_estimate();
        assert_eq!(estimate.estimated_words, 2500);
        assert_eq!(estimate.estimated_reading_time, 10);
    }

    #[test]
    fn test_estimate_rounds_up() {
        let estimate = estimate_chapter(10_001, 4).unwrap();
        assert_eq!(estimate.estimated_words, 2501);
        assert_eq!(estimate.estimated_reading_time, 11);

        let estimate = estimate_chapter(1, 3).unwrap();
        assert_eq!(estimate.estimated_words, 1);
        assert_eq!(estimate.estimated_reading_time, 1);
    }

    #[test]
    fn test_reading_minutes() {
        assert_eq!(reading_minutes(0), 0);
        assert_eq!(reading_minutes(250), 1);
        assert_eq!(reading_minutes(251), 2);
    }

    #[test]
    fn test_estimate_zero_chapters_is_rejected() {
        assert!(matches!(
            estimate_chapter(50_000, 0),
            Err(StructureError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_plan_rejects_non_positive_inputs() {
        assert!(ChapterPlan::new(0, StoryStructure::ThreeAct, 1000).is_err());
        assert!(ChapterPlan::new(-3, StoryStructure::ThreeAct, 1000).is_err());
        assert!(ChapterPlan::new(10, StoryStructure::ThreeAct, 0).is_err());
    }

    #[test]
    fn test_plan_rejects_oversized_total() {
        assert!(ChapterPlan::new(
            i64::from(MAX_TOTAL_CHAPTERS),
            StoryStructure::Kishotenketsu,
            1
        )
        .is_ok());
        for total in [i64::from(MAX_TOTAL_CHAPTERS) + 1, 4_000_000_000] {
            assert!(matches!(
                ChapterPlan::new(total, StoryStructure::Kishotenketsu, 1),
                Err(StructureError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_plan_phase_name_of() {
        let plan = ChapterPlan::new(10, StoryStructure::ThreeAct, 100_000).unwrap();
        assert_eq!(plan.phase_name_of(9), "第三幕");
        assert_eq!(plan.phase_name_of(11), crate::domain::structure::UNCLASSIFIED);
    }

    #[test]
    fn test_plan_structure() {
        let plan = ChapterPlan::new(10, StoryStructure::ThreeAct, 100_000).unwrap();
        let structure = plan.chapter_structure();
        assert_eq!(structure.total_chapters(), 10);
        assert_eq!(structure.phases()[1].chapters(), &[4, 5, 6, 7, 8]);
    }
}
