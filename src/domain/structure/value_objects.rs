//! Structure Context - Value Objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::StructureError;

/// 叙事结构模板
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoryStructure {
    /// 起承転結（4 阶段）
    #[serde(rename = "kishotenketsu")]
    Kishotenketsu,
    /// 三幕构成（3 阶段）
    #[serde(rename = "three-act")]
    ThreeAct,
}

impl StoryStructure {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryStructure::Kishotenketsu => "kishotenketsu",
            StoryStructure::ThreeAct => "three-act",
        }
    }

    /// 阶段数量
    pub fn phase_count(&self) -> usize {
        match self {
            StoryStructure::Kishotenketsu => 4,
            StoryStructure::ThreeAct => 3,
        }
    }
}

impl Default for StoryStructure {
    fn default() -> Self {
        StoryStructure::Kishotenketsu
    }
}

impl FromStr for StoryStructure {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kishotenketsu" => Ok(StoryStructure::Kishotenketsu),
            "three-act" => Ok(StoryStructure::ThreeAct),
            other => Err(StructureError::UnknownStructure(other.to_string())),
        }
    }
}

impl fmt::Display for StoryStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_structure() {
        assert_eq!(
            "kishotenketsu".parse::<StoryStructure>().unwrap(),
            StoryStructure::Kishotenketsu
        );
        assert_eq!(
            "three-act".parse::<StoryStructure>().unwrap(),
            StoryStructure::ThreeAct
        );
        assert!(matches!(
            "hero-journey".parse::<StoryStructure>(),
            Err(StructureError::UnknownStructure(_))
        ));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&StoryStructure::ThreeAct).unwrap();
        assert_eq!(json, "\"three-act\"");
        let parsed: StoryStructure = serde_json::from_str("\"kishotenketsu\"").unwrap();
        assert_eq!(parsed, StoryStructure::Kishotenketsu);
    }
}
