//! 提示词模板
//!
//! 每个步骤的提示词 = 企划上下文 + 当前步骤的任务说明 + 输出格式约束。
//! 结构化结果一律要求 JSON，正文（梗概、草稿）要求纯文本。

use crate::application::ports::{
    ChapterRecord, CharacterRecord, EpisodeRecord, PlotRecord, ProjectRecord, SynopsisRecord,
};
use crate::domain::project::Genre;
use crate::domain::structure::ChapterStructure;

pub const SYSTEM_PROMPT: &str = "あなたは経験豊富な小説編集者であり、作家の企画づくりを支援するアシスタントです。\
与えられた設定と矛盾しない内容を、日本語で具体的に提案してください。";

/// 提示词所需的企划状态
#[derive(Debug, Clone, Copy)]
pub struct StoryContext<'a> {
    pub project: &'a ProjectRecord,
    pub characters: &'a [CharacterRecord],
    pub plot: Option<&'a PlotRecord>,
    pub synopsis: Option<&'a SynopsisRecord>,
}

impl<'a> StoryContext<'a> {
    pub fn new(project: &'a ProjectRecord) -> Self {
        Self {
            project,
            characters: &[],
            plot: None,
            synopsis: None,
        }
    }

    pub fn with_characters(mut self, characters: &'a [CharacterRecord]) -> Self {
        self.characters = characters;
        self
    }

    pub fn with_plot(mut self, plot: Option<&'a PlotRecord>) -> Self {
        self.plot = plot;
        self
    }

    pub fn with_synopsis(mut self, synopsis: Option<&'a SynopsisRecord>) -> Self {
        self.synopsis = synopsis;
        self
    }

    fn render(&self, out: &mut String) {
        let project = self.project;
        push_line(out, "## 作品情報");
        push_line(out, format!("- タイトル: {}", project.title));
        push_line(
            out,
            format!("- ジャンル: {}", Genre::new(project.genre.as_str()).describe()),
        );
        if !project.description.trim().is_empty() {
            push_line(out, format!("- 概要: {}", project.description.trim()));
        }

        if !self.characters.is_empty() {
            push_line(out, "");
            push_line(out, "## 登場人物");
            for c in self.characters {
                push_line(out, format!("- {}（{}）", c.name, or_unset(&c.role)));
                push_field(out, "性格", &c.personality);
                push_field(out, "背景", &c.background);
                push_field(out, "外見", &c.appearance);
            }
        }

        if let Some(plot) = self.plot {
            push_line(out, "");
            push_line(out, "## プロット");
            push_field(out, "テーマ", &plot.theme);
            push_field(out, "舞台", &plot.setting);
            push_field(out, "つかみ", &plot.hook);
            push_field(out, "主人公の目的", &plot.protagonist_goal);
            push_field(out, "主な対立", &plot.main_conflict);
            push_field(out, "結末", &plot.ending);
        }

        if let Some(synopsis) = self.synopsis {
            if !synopsis.content.trim().is_empty() {
                push_line(out, "");
                push_line(out, "## あらすじ");
                push_line(out, synopsis.content.trim());
            }
        }
    }
}

fn push_line(out: &mut String, line: impl AsRef<str>) {
    out.push_str(line.as_ref());
    out.push('\n');
}

fn push_field(out: &mut String, label: &str, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        push_line(out, format!("  - {}: {}", label, value));
    }
}

fn push_hint(out: &mut String, hint: Option<&str>) {
    if let Some(hint) = hint.map(str::trim).filter(|h| !h.is_empty()) {
        push_line(out, "");
        push_line(out, "## 作者からの要望");
        push_line(out, hint);
    }
}

fn or_unset(value: &str) -> &str {
    if value.trim().is_empty() {
        "役割未設定"
    } else {
        value
    }
}

/// 角色生成
pub fn characters_prompt(ctx: &StoryContext<'_>, count: u32, hint: Option<&str>) -> String {
    let mut out = String::new();
    ctx.render(&mut out);
    push_hint(&mut out, hint);

    push_line(&mut out, "");
    push_line(&mut out, "## 指示");
    if ctx.characters.is_empty() {
        push_line(&mut out, format!("この作品の登場人物を{}人提案してください。", count));
    } else {
        push_line(
            &mut out,
            format!(
                "既存の登場人物と重複しない新しい登場人物を{}人提案してください。",
                count
            ),
        );
    }
    push_line(
        &mut out,
        "出力は JSON のみ: {\"characters\": [{\"name\": \"\", \"role\": \"\", \"personality\": \"\", \"background\": \"\", \"appearance\": \"\"}]}",
    );
    out
}

/// 情节生成
pub fn plot_prompt(ctx: &StoryContext<'_>, hint: Option<&str>) -> String {
    let mut out = String::new();
    ctx.render(&mut out);
    push_hint(&mut out, hint);

    push_line(&mut out, "");
    push_line(&mut out, "## 指示");
    push_line(
        &mut out,
        "登場人物を活かしたプロットを提案してください。",
    );
    push_line(
        &mut out,
        "出力は JSON のみ: {\"theme\": \"\", \"setting\": \"\", \"hook\": \"\", \"protagonist_goal\": \"\", \"main_conflict\": \"\", \"ending\": \"\"}",
    );
    out
}

/// 梗概生成
pub fn synopsis_prompt(ctx: &StoryContext<'_>, hint: Option<&str>) -> String {
    let mut out = String::new();
    ctx.render(&mut out);
    push_hint(&mut out, hint);

    push_line(&mut out, "");
    push_line(&mut out, "## 指示");
    push_line(
        &mut out,
        "プロットに沿って、物語の始まりから結末までのあらすじを 800〜1200 字で書いてください。",
    );
    push_line(&mut out, "出力はあらすじ本文のみ（見出しや説明は不要）。");
    out
}

/// 章节大纲生成
pub fn chapters_prompt(
    ctx: &StoryContext<'_>,
    structure: &ChapterStructure,
    hint: Option<&str>,
) -> String {
    let mut out = String::new();
    ctx.render(&mut out);
    push_hint(&mut out, hint);

    push_line(&mut out, "");
    push_line(
        &mut out,
        format!(
            "## 章構成（{}、全{}章）",
            structure.structure(),
            structure.total_chapters()
        ),
    );
    for phase in structure.phases() {
        let chapters = match (phase.chapters().first(), phase.chapters().last()) {
            (Some(first), Some(last)) if first == last => format!("第{}章", first),
            (Some(first), Some(last)) => format!("第{}〜{}章", first, last),
            _ => "該当章なし".to_string(),
        };
        push_line(
            &mut out,
            format!("- {}（{}）: {}", phase.name(), chapters, phase.description()),
        );
    }

    push_line(&mut out, "");
    push_line(&mut out, "## 指示");
    push_line(
        &mut out,
        format!(
            "上記の章構成に従い、全{}章それぞれのタイトルと要約（100〜200字）を提案してください。",
            structure.total_chapters()
        ),
    );
    push_line(
        &mut out,
        "出力は JSON のみ: {\"chapters\": [{\"number\": 1, \"title\": \"\", \"summary\": \"\"}]}",
    );
    out
}

/// 分集生成
pub fn episodes_prompt(
    ctx: &StoryContext<'_>,
    chapter: &ChapterRecord,
    existing: &[EpisodeRecord],
    count: u32,
    hint: Option<&str>,
) -> String {
    let mut out = String::new();
    ctx.render(&mut out);
    push_hint(&mut out, hint);

    push_line(&mut out, "");
    push_line(
        &mut out,
        format!("## 対象の章: 第{}章「{}」", chapter.number, chapter.title),
    );
    push_field(&mut out, "構成上の位置", &chapter.structure);
    push_field(&mut out, "要約", &chapter.summary);
    if !existing.is_empty() {
        push_line(&mut out, "- 既存のエピソード:");
        for episode in existing {
            push_line(
                &mut out,
                format!("  - {}. {}: {}", episode.number, episode.title, episode.summary),
            );
        }
    }

    push_line(&mut out, "");
    push_line(&mut out, "## 指示");
    push_line(
        &mut out,
        format!(
            "この章を構成するエピソード（場面）を{}個、時系列順に提案してください。",
            count
        ),
    );
    push_line(
        &mut out,
        "出力は JSON のみ: {\"episodes\": [{\"number\": 1, \"title\": \"\", \"summary\": \"\"}]}",
    );
    out
}

/// 草稿生成
pub fn draft_prompt(
    ctx: &StoryContext<'_>,
    chapter: &ChapterRecord,
    episodes: &[EpisodeRecord],
    hint: Option<&str>,
) -> String {
    let mut out = String::new();
    ctx.render(&mut out);
    push_hint(&mut out, hint);

    push_line(&mut out, "");
    push_line(
        &mut out,
        format!("## 執筆する章: 第{}章「{}」", chapter.number, chapter.title),
    );
    push_field(&mut out, "構成上の位置", &chapter.structure);
    push_field(&mut out, "要約", &chapter.summary);
    if !episodes.is_empty() {
        push_line(&mut out, "- エピソード:");
        for episode in episodes {
            push_line(
                &mut out,
                format!("  - {}. {}: {}", episode.number, episode.title, episode.summary),
            );
        }
    }

    push_line(&mut out, "");
    push_line(&mut out, "## 指示");
    if chapter.estimated_words > 0 {
        push_line(
            &mut out,
            format!(
                "この章の本文を約{}字で執筆してください。",
                chapter.estimated_words
            ),
        );
    } else {
        push_line(&mut out, "この章の本文を執筆してください。");
    }
    push_line(&mut out, "出力は小説本文のみ（見出しや説明は不要）。");
    out
}
