//! Structure Context - 章节阶段划分
//!
//! 划分规则:
//! - 起承転結: base = ceil(total / 4)，前三个阶段各 base 章，余数落在「結」
//! - 三幕构成: act1 = ceil(total * 0.25)，act2 = ceil(total * 0.5)，余数落在第三幕
//!
//! 余数可能为 0 或负数，此时最后阶段为空。所有区间都截断到 total，
//! 不会生成超出 1..=total 的章节号。

use serde::Serialize;

use super::StoryStructure;

/// 不属于任何阶段时返回的名称
pub const UNCLASSIFIED: &str = "unclassified";

/// 叙事阶段
///
/// 不变量:
/// - chapters 连续、升序、从 1 开始计数
/// - 同一结构内各阶段互不重叠
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phase {
    name: &'static str,
    description: &'static str,
    chapters: Vec<u32>,
}

impl Phase {
    fn new(name: &'static str, description: &'static str, chapters: Vec<u32>) -> Self {
        Self {
            name,
            description,
            chapters,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn chapters(&self) -> &[u32] {
        &self.chapters
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn contains(&self, chapter: u32) -> bool {
        self.chapters.binary_search(&chapter).is_ok()
    }
}

/// 章节结构（阶段划分结果）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterStructure {
    structure: StoryStructure,
    total_chapters: u32,
    phases: Vec<Phase>,
}

impl ChapterStructure {
    /// 计算阶段划分
    ///
    /// total_chapters 为 0 时所有阶段为空。
    pub fn compute(structure: StoryStructure, total_chapters: u32) -> Self {
        let total = u64::from(total_chapters);
        let phases = bounds(structure, total)
            .into_iter()
            .map(|b| b.into_phase(total))
            .collect();

        Self {
            structure,
            total_chapters,
            phases,
        }
    }

    pub fn structure(&self) -> StoryStructure {
        self.structure
    }

    pub fn total_chapters(&self) -> u32 {
        self.total_chapters
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// 按顺序查找第一个包含该章节的阶段
    pub fn phase_of(&self, chapter: u32) -> Option<&Phase> {
        self.phases.iter().find(|phase| phase.contains(chapter))
    }

    /// 章节所属阶段名，找不到时为 [`UNCLASSIFIED`]
    pub fn phase_name_of(&self, chapter: u32) -> &'static str {
        self.phase_of(chapter)
            .map(Phase::name)
            .unwrap_or(UNCLASSIFIED)
    }
}

/// 阶段边界（闭区间 first..=last，未截断）
struct Bounds {
    name: &'static str,
    description: &'static str,
    first: u64,
    last: u64,
}

impl Bounds {
    fn contains(&self, chapter: u64, total: u64) -> bool {
        chapter >= self.first && chapter <= self.last.min(total)
    }

    /// 展开为章节号，截断到 total
    fn into_phase(self, total: u64) -> Phase {
        let last = self.last.min(total);
        let chapters = if self.first > last {
            Vec::new()
        } else {
            (self.first..=last).map(|n| n as u32).collect()
        };
        Phase::new(self.name, self.description, chapters)
    }
}

fn bounds(structure: StoryStructure, total: u64) -> Vec<Bounds> {
    match structure {
        StoryStructure::Kishotenketsu => kishotenketsu(total),
        StoryStructure::ThreeAct => three_act(total),
    }
}

/// 不展开章节列表，直接按区间边界求章节所属阶段名
pub fn phase_name_for(
    structure: StoryStructure,
    total_chapters: u32,
    chapter: u32,
) -> &'static str {
    let total = u64::from(total_chapters);
    let chapter = u64::from(chapter);
    bounds(structure, total)
        .into_iter()
        .find(|b| b.contains(chapter, total))
        .map(|b| b.name)
        .unwrap_or(UNCLASSIFIED)
}

fn kishotenketsu(total: u64) -> Vec<Bounds> {
    let base = total.div_ceil(4);

    vec![
        Bounds {
            name: "起",
            description: "導入：登場人物と舞台を提示し、物語の前提を示す",
            first: 1,
            last: base,
        },
        Bounds {
            name: "承",
            description: "展開：出来事が発展し、人物同士の関係が深まる",
            first: base + 1,
            last: 2 * base,
        },
        Bounds {
            name: "転",
            description: "転換：予想外の出来事で物語が大きく動く",
            first: 2 * base + 1,
            last: 3 * base,
        },
        Bounds {
            name: "結",
            description: "結末：伏線を回収し、物語を収束させる",
            first: 3 * base + 1,
            last: total,
        },
    ]
}

fn three_act(total: u64) -> Vec<Bounds> {
    let act1 = total.div_ceil(4);
    let act2 = total.div_ceil(2);

    vec![
        Bounds {
            name: "第一幕",
            description: "設定：主人公と世界を紹介し、物語のきっかけとなる事件が起こる",
            first: 1,
            last: act1,
        },
        Bounds {
            name: "第二幕",
            description: "対立：障害と葛藤が高まり、主人公が試される",
            first: act1 + 1,
            last: act1 + act2,
        },
        Bounds {
            name: "第三幕",
            description: "解決：クライマックスを迎え、物語が決着する",
            first: act1 + act2 + 1,
            last: total,
        },
    ]
}
