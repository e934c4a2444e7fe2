//! Project Context - 写作步骤

use serde::{Deserialize, Serialize};

use super::ProjectError;

/// 写作步骤（1..=6）
///
/// 不变量:
/// - 编号连续，Characters 为 1，Draft 为 6
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritingStep {
    Characters,
    Plot,
    Synopsis,
    Chapters,
    Episodes,
    Draft,
}

impl WritingStep {
    pub const ALL: [WritingStep; 6] = [
        WritingStep::Characters,
        WritingStep::Plot,
        WritingStep::Synopsis,
        WritingStep::Chapters,
        WritingStep::Episodes,
        WritingStep::Draft,
    ];

    pub fn number(&self) -> u8 {
        match self {
            WritingStep::Characters => 1,
            WritingStep::Plot => 2,
            WritingStep::Synopsis => 3,
            WritingStep::Chapters => 4,
            WritingStep::Episodes => 5,
            WritingStep::Draft => 6,
        }
    }

    pub fn from_number(number: i64) -> Result<Self, ProjectError> {
        Self::ALL
            .iter()
            .copied()
            .find(|step| i64::from(step.number()) == number)
            .ok_or(ProjectError::InvalidStep(number))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WritingStep::Characters => "characters",
            WritingStep::Plot => "plot",
            WritingStep::Synopsis => "synopsis",
            WritingStep::Chapters => "chapters",
            WritingStep::Episodes => "episodes",
            WritingStep::Draft => "draft",
        }
    }

    /// 下一步，Draft 之后为 None
    pub fn next(&self) -> Option<Self> {
        Self::from_number(i64::from(self.number()) + 1).ok()
    }

    pub fn is_last(&self) -> bool {
        matches!(self, WritingStep::Draft)
    }
}

impl Default for WritingStep {
    fn default() -> Self {
        WritingStep::Characters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_numbers_are_contiguous() {
        for (i, step) in WritingStep::ALL.iter().enumerate() {
            assert_eq!(step.number() as usize, i + 1);
            assert_eq!(WritingStep::from_number(i as i64 + 1).unwrap(), *step);
        }
    }

    #[test]
    fn test_step_out_of_range() {
        assert!(WritingStep::from_number(0).is_err());
        assert!(WritingStep::from_number(7).is_err());
    }

    #[test]
    fn test_next_step() {
        assert_eq!(WritingStep::Characters.next(), Some(WritingStep::Plot));
        assert_eq!(WritingStep::Episodes.next(), Some(WritingStep::Draft));
        assert_eq!(WritingStep::Draft.next(), None);
        assert!(WritingStep::Draft.is_last());
    }
}
