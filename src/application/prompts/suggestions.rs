//! 生成结果类型
//!
//! 字段全部带默认值，模型漏掉字段时不至于整体解析失败；
//! 同时接受 camelCase 别名。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterSuggestion {
    pub name: String,
    pub role: String,
    pub personality: String,
    pub background: String,
    pub appearance: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSuggestion {
    pub theme: String,
    pub setting: String,
    pub hook: String,
    #[serde(alias = "protagonistGoal")]
    pub protagonist_goal: String,
    #[serde(alias = "mainConflict")]
    pub main_conflict: String,
    pub ending: String,
}

/// 模型给出的章节大纲
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChapterOutline {
    #[serde(alias = "chapter", alias = "chapterNumber")]
    pub number: Option<u32>,
    pub title: String,
    pub summary: String,
}

/// 模型给出的分集大纲
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeOutline {
    #[serde(alias = "episode", alias = "episodeNumber")]
    pub number: Option<u32>,
    pub title: String,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let c: CharacterSuggestion = serde_json::from_str(r#"{"name":"遥"}"#).unwrap();
        assert_eq!(c.name, "遥");
        assert!(c.role.is_empty());
    }

    #[test]
    fn test_camel_case_aliases() {
        let p: PlotSuggestion =
            serde_json::from_str(r#"{"protagonistGoal":"帰郷","mainConflict":"嵐"}"#).unwrap();
        assert_eq!(p.protagonist_goal, "帰郷");
        assert_eq!(p.main_conflict, "嵐");

        let c: ChapterOutline =
            serde_json::from_str(r#"{"chapterNumber":3,"title":"夜明け"}"#).unwrap();
        assert_eq!(c.number, Some(3));
    }
}
