//! Generate Command Handlers
//!
//! 根据企划当前状态拼装提示词，调用选定的 LLM，解析为结构化建议。
//! 生成结果不落库，由用户确认后通过对应的保存命令写入。

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::chapter_handlers::require_chapter;
use super::project_handlers::require_project;
use crate::application::commands::{
    GenerateChapters, GenerateCharacters, GenerateDraft, GenerateEpisodes, GenerateOptions,
    GeneratePlot, GenerateSynopsis,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    CharacterRecord, CompletionRequest, LlmRegistry, PlotRecord, ProjectRecord,
    StoryRepositoryPort, SynopsisRecord,
};
use crate::application::prompts::{
    chapters_prompt, characters_prompt, draft_prompt, episodes_prompt, parse_json, parse_list,
    plain_text, plot_prompt, synopsis_prompt, ChapterOutline, CharacterSuggestion,
    EpisodeOutline, PlotSuggestion, StoryContext, SYSTEM_PROMPT,
};

/// 单次可生成的最大条目数
pub const MAX_GENERATE_COUNT: u32 = 10;

/// 生成结果及其来源
#[derive(Debug, Clone, Serialize)]
pub struct Generated<T> {
    pub provider: String,
    pub model: String,
    pub result: T,
}

/// 章节建议（已按章节计划补全结构标签与估算）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterSuggestion {
    pub number: u32,
    pub title: String,
    pub summary: String,
    pub structure: String,
    pub estimated_words: u32,
    pub estimated_reading_time: u32,
}

/// 分集建议
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeSuggestion {
    pub number: u32,
    pub title: String,
    pub summary: String,
}

fn validate_count(count: u32) -> Result<u32, ApplicationError> {
    if count == 0 || count > MAX_GENERATE_COUNT {
        return Err(ApplicationError::validation(format!(
            "生成数量必须在 1 到 {} 之间",
            MAX_GENERATE_COUNT
        )));
    }
    Ok(count)
}

/// 提示词上下文所需的企划状态
struct StoryState {
    project: ProjectRecord,
    characters: Vec<CharacterRecord>,
    plot: Option<PlotRecord>,
    synopsis: Option<SynopsisRecord>,
}

impl StoryState {
    fn context(&self) -> StoryContext<'_> {
        StoryContext::new(&self.project)
            .with_characters(&self.characters)
            .with_plot(self.plot.as_ref())
            .with_synopsis(self.synopsis.as_ref())
    }
}

/// 各生成 Handler 共享的仓储与模型访问
struct Generator {
    repo: Arc<dyn StoryRepositoryPort>,
    llm: Arc<LlmRegistry>,
}

impl Generator {
    async fn load_state(&self, project_id: Uuid) -> Result<StoryState, ApplicationError> {
        let project = require_project(self.repo.as_ref(), project_id).await?;
        let characters = self.repo.find_characters(project_id).await?;
        let plot = self.repo.find_plot(project_id).await?;
        let synopsis = self.repo.find_synopsis(project_id).await?;

        Ok(StoryState {
            project,
            characters,
            plot,
            synopsis,
        })
    }

    async fn complete(
        &self,
        options: &GenerateOptions,
        prompt: String,
        json: bool,
    ) -> Result<Generated<String>, ApplicationError> {
        let provider = self.llm.resolve(options.provider.as_deref())?;

        let mut request = CompletionRequest::new(prompt)
            .with_system(SYSTEM_PROMPT)
            .with_temperature(self.llm.temperature());
        if json {
            request = request.json();
        }

        let started = std::time::Instant::now();
        let response = provider.complete(request).await?;

        tracing::info!(
            provider = provider.name(),
            model = %response.model,
            output_len = response.text.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "LLM completion finished"
        );

        Ok(Generated {
            provider: provider.name().to_string(),
            model: response.model,
            result: response.text,
        })
    }
}

impl Generated<String> {
    /// 把原始输出解析为结构化结果，保留来源信息
    fn map<U>(
        self,
        f: impl FnOnce(String) -> Result<U, ApplicationError>,
    ) -> Result<Generated<U>, ApplicationError> {
        Ok(Generated {
            result: f(self.result)?,
            provider: self.provider,
            model: self.model,
        })
    }
}

// ============================================================================
// GenerateCharacters
// ============================================================================

pub struct GenerateCharactersHandler {
    generator: Generator,
}

impl GenerateCharactersHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>, llm: Arc<LlmRegistry>) -> Self {
        Self {
            generator: Generator { repo, llm },
        }
    }

    /// 无名字的条目丢弃，多出的条目截断
    pub async fn handle(
        &self,
        command: GenerateCharacters,
    ) -> Result<Generated<Vec<CharacterSuggestion>>, ApplicationError> {
        let count = validate_count(command.count)?;
        let state = self.generator.load_state(command.project_id).await?;
        let prompt = characters_prompt(&state.context(), count, command.options.hint.as_deref());

        let generated = self.generator.complete(&command.options, prompt, true).await?;
        generated.map(|text| {
            let characters: Vec<CharacterSuggestion> =
                parse_list::<CharacterSuggestion>(&text, "characters")?
                    .into_iter()
                    .filter(|c| !c.name.trim().is_empty())
                    .take(count as usize)
                    .collect();
            if characters.is_empty() {
                return Err(ApplicationError::external("模型未返回任何角色"));
            }
            Ok(characters)
        })
    }
}

// ============================================================================
// GeneratePlot
// ============================================================================

pub struct GeneratePlotHandler {
    generator: Generator,
}

impl GeneratePlotHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>, llm: Arc<LlmRegistry>) -> Self {
        Self {
            generator: Generator { repo, llm },
        }
    }

    pub async fn handle(
        &self,
        command: GeneratePlot,
    ) -> Result<Generated<PlotSuggestion>, ApplicationError> {
        let state = self.generator.load_state(command.project_id).await?;
        let prompt = plot_prompt(&state.context(), command.options.hint.as_deref());

        let generated = self.generator.complete(&command.options, prompt, true).await?;
        generated.map(|text| Ok(parse_json::<PlotSuggestion>(&text)?))
    }
}

// ============================================================================
// GenerateSynopsis
// ============================================================================

pub struct GenerateSynopsisHandler {
    generator: Generator,
}

impl GenerateSynopsisHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>, llm: Arc<LlmRegistry>) -> Self {
        Self {
            generator: Generator { repo, llm },
        }
    }

    pub async fn handle(
        &self,
        command: GenerateSynopsis,
    ) -> Result<Generated<String>, ApplicationError> {
        let state = self.generator.load_state(command.project_id).await?;
        let prompt = synopsis_prompt(&state.context(), command.options.hint.as_deref());

        let generated = self.generator.complete(&command.options, prompt, false).await?;
        generated.map(|text| Ok(plain_text(&text)?))
    }
}

// ============================================================================
// GenerateChapters
// ============================================================================

pub struct GenerateChaptersHandler {
    generator: Generator,
}

impl GenerateChaptersHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>, llm: Arc<LlmRegistry>) -> Self {
        Self {
            generator: Generator { repo, llm },
        }
    }

    /// 章节号按输出顺序重新编号，超出计划章节数的部分截断；
    /// 结构标签和估算取自章节计划，不采信模型给出的值
    pub async fn handle(
        &self,
        command: GenerateChapters,
    ) -> Result<Generated<Vec<ChapterSuggestion>>, ApplicationError> {
        let plan = command.plan;
        let structure = plan.chapter_structure();
        let estimate = plan.chapter_estimate();

        let state = self.generator.load_state(command.project_id).await?;
        let prompt = chapters_prompt(
            &state.context(),
            &structure,
            command.options.hint.as_deref(),
        );

        let generated = self.generator.complete(&command.options, prompt, true).await?;
        generated.map(|text| {
            let outlines = parse_list::<ChapterOutline>(&text, "chapters")?;
            let chapters: Vec<ChapterSuggestion> = outlines
                .into_iter()
                .take(plan.total_chapters() as usize)
                .zip(1u32..)
                .map(|(outline, number)| ChapterSuggestion {
                    number,
                    title: outline.title,
                    summary: outline.summary,
                    structure: structure.phase_name_of(number).to_string(),
                    estimated_words: estimate.estimated_words,
                    estimated_reading_time: estimate.estimated_reading_time,
                })
                .collect();

            if chapters.len() < plan.total_chapters() as usize {
                tracing::warn!(
                    expected = plan.total_chapters(),
                    received = chapters.len(),
                    "Model returned fewer chapters than planned"
                );
            }
            Ok(chapters)
        })
    }
}

// ============================================================================
// GenerateEpisodes
// ============================================================================

pub struct GenerateEpisodesHandler {
    generator: Generator,
}

impl GenerateEpisodesHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>, llm: Arc<LlmRegistry>) -> Self {
        Self {
            generator: Generator { repo, llm },
        }
    }

    /// 编号接在该章已有分集之后
    pub async fn handle(
        &self,
        command: GenerateEpisodes,
    ) -> Result<Generated<Vec<EpisodeSuggestion>>, ApplicationError> {
        let count = validate_count(command.count)?;
        let repo = self.generator.repo.as_ref();
        let chapter = require_chapter(repo, command.chapter_id).await?;
        let existing = repo.find_episodes(chapter.id).await?;
        let state = self.generator.load_state(chapter.project_id).await?;

        let prompt = episodes_prompt(
            &state.context(),
            &chapter,
            &existing,
            count,
            command.options.hint.as_deref(),
        );

        let offset = existing.iter().map(|e| e.number).max().unwrap_or(0);
        let generated = self.generator.complete(&command.options, prompt, true).await?;
        generated.map(|text| {
            Ok(parse_list::<EpisodeOutline>(&text, "episodes")?
                .into_iter()
                .take(count as usize)
                .zip(1u32..)
                .map(|(outline, i)| EpisodeSuggestion {
                    number: offset + i,
                    title: outline.title,
                    summary: outline.summary,
                })
                .collect())
        })
    }
}

// ============================================================================
// GenerateDraft
// ============================================================================

pub struct GenerateDraftHandler {
    generator: Generator,
}

impl GenerateDraftHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>, llm: Arc<LlmRegistry>) -> Self {
        Self {
            generator: Generator { repo, llm },
        }
    }

    pub async fn handle(
        &self,
        command: GenerateDraft,
    ) -> Result<Generated<String>, ApplicationError> {
        let repo = self.generator.repo.as_ref();
        let chapter = require_chapter(repo, command.chapter_id).await?;
        let episodes = repo.find_episodes(chapter.id).await?;
        let state = self.generator.load_state(chapter.project_id).await?;

        let prompt = draft_prompt(
            &state.context(),
            &chapter,
            &episodes,
            command.options.hint.as_deref(),
        );

        let generated = self.generator.complete(&command.options, prompt, false).await?;
        generated.map(|text| Ok(plain_text(&text)?))
    }
}
