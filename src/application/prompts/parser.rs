//! 模型输出解析
//!
//! 模型经常在 JSON 前后附带说明文字或 Markdown 代码块，
//! 这里按起始位置尝试每个括号配平的片段，取第一个能反序列化的。

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no JSON found in model output")]
    NoJson,

    #[error("unexpected JSON shape: {0}")]
    InvalidShape(String),

    #[error("empty model output")]
    Empty,
}

/// 解析第一个可反序列化为 `T` 的 JSON 片段
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, ParseError> {
    json_candidates(text)
        .into_iter()
        .find_map(|candidate| serde_json::from_str::<T>(candidate).ok())
        .ok_or(ParseError::NoJson)
}

/// 解析列表
///
/// 接受三种形态:
/// - 裸数组 `[...]`
/// - 包了一层的对象 `{"characters": [...]}`：优先取 `key` 字段；
///   没有该字段时取任一数组字段（按键名字典序，而非原文顺序）
/// - 单个对象（视为只有一项）
pub fn parse_list<T: DeserializeOwned>(text: &str, key: &str) -> Result<Vec<T>, ParseError> {
    let value: Value = parse_json(text)?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => items,
            Some(other) => return Err(ParseError::InvalidShape(other.to_string())),
            None => {
                let nested = map.values().find_map(|v| match v {
                    Value::Array(items) => Some(items.clone()),
                    _ => None,
                });
                match nested {
                    Some(items) => items,
                    None => vec![Value::Object(map)],
                }
            }
        },
        other => return Err(ParseError::InvalidShape(other.to_string())),
    };

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).map_err(|e| ParseError::InvalidShape(e.to_string()))
        })
        .collect()
}

/// 纯文本输出：去掉首尾空白和包裹的代码块
pub fn plain_text(text: &str) -> Result<String, ParseError> {
    let trimmed = text.trim();
    let unfenced = match trimmed.strip_prefix("```") {
        Some(rest) => {
            // 跳过语言标记行
            let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
            body.trim_end().strip_suffix("```").unwrap_or(body)
        }
        None => trimmed,
    };

    let cleaned = unfenced.trim();
    if cleaned.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(cleaned.to_string())
}

/// 所有括号配平的片段，按起始位置排序（外层在前）
///
/// 一次扫描，用栈记录未闭合的开括号；引号只在括号内才视为字符串边界，
/// 正文里的引号不影响配对
fn json_candidates(text: &str) -> Vec<&str> {
    let mut open: Vec<usize> = Vec::new();
    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' if !open.is_empty() => in_string = true,
            '{' | '[' => open.push(i),
            '}' | ']' => {
                if let Some(start) = open.pop() {
                    spans.push((start, i + c.len_utf8()));
                }
            }
            _ => {}
        }
    }

    spans.sort_unstable_by_key(|(start, _)| *start);
    spans
        .into_iter()
        .map(|(start, end)| &text[start..end])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        name: String,
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = "以下が結果です。\n```json\n{\"name\": \"美咲\"}\n```\nよろしくお願いします。";
        let item: Item = parse_json(text).unwrap();
        assert_eq!(item.name, "美咲");
    }

    #[test]
    fn test_parse_skips_non_json_brackets() {
        let text = "[注意] 出力: {\"name\": \"蓮 {仮}\"}";
        let item: Item = parse_json(text).unwrap();
        assert_eq!(item.name, "蓮 {仮}");
    }

    #[test]
    fn test_parse_no_json() {
        assert!(matches!(
            parse_json::<Item>("申し訳ありません"),
            Err(ParseError::NoJson)
        ));
    }

    #[test]
    fn test_parse_list_shapes() {
        let bare: Vec<Item> = parse_list(r#"[{"name":"a"},{"name":"b"}]"#, "characters").unwrap();
        assert_eq!(bare.len(), 2);

        let wrapped: Vec<Item> =
            parse_list(r#"{"characters":[{"name":"a"},{"name":"b"},{"name":"c"}]}"#, "characters")
                .unwrap();
        assert_eq!(wrapped.len(), 3);
        assert_eq!(wrapped[2].name, "c");

        let single: Vec<Item> = parse_list(r#"{"name":"solo"}"#, "characters").unwrap();
        assert_eq!(single, vec![Item { name: "solo".to_string() }]);
    }

    #[test]
    fn test_parse_list_rejects_scalars() {
        assert!(parse_list::<Item>("[1, 2]", "characters").is_err());
        assert!(parse_list::<Item>(r#"{"characters": "none"}"#, "characters").is_err());
    }

    #[test]
    fn test_parse_list_prefers_expected_key() {
        // 字典序上 "aliases" 在 "characters" 之前
        let text = r#"{"characters":[{"name":"真壁"}],"aliases":[{"name":"別名"}]}"#;
        let items: Vec<Item> = parse_list(text, "characters").unwrap();
        assert_eq!(items, vec![Item { name: "真壁".to_string() }]);

        let items: Vec<Item> = parse_list(r#"{"list":[{"name":"a"}]}"#, "characters").unwrap();
        assert_eq!(items[0].name, "a");
    }

    #[test]
    fn test_prose_quotes_do_not_break_scan() {
        let text = "「結果」は \"以下\" です: {\"name\": \"早苗\"}";
        let item: Item = parse_json(text).unwrap();
        assert_eq!(item.name, "早苗");
    }

    #[test]
    fn test_inner_object_found_when_outer_does_not_match() {
        let text = r#"{"result": {"name": "灯"}, "note": [1, 2]}"#;
        let item: Item = parse_json(text).unwrap();
        assert_eq!(item.name, "灯");
    }

    #[test]
    fn test_scan_handles_deep_nesting() {
        let depth = 20_000;
        let text = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let candidates = json_candidates(&text);
        assert_eq!(candidates.len(), depth);
        assert_eq!(candidates[0].len(), text.len());
        assert_eq!(candidates[depth - 1], "[]");
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(plain_text("  本文です。 \n").unwrap(), "本文です。");
        assert_eq!(
            plain_text("```markdown\n第一段落。\n第二段落。\n```").unwrap(),
            "第一段落。\n第二段落。"
        );
        assert!(matches!(plain_text("```\n```"), Err(ParseError::Empty)));
        assert!(matches!(plain_text("   "), Err(ParseError::Empty)));
    }
}
