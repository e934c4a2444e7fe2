//! Chapter Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::project_handlers::require_project;
use crate::application::commands::{CreateChapter, DeleteChapter, UpdateChapter};
use crate::application::error::ApplicationError;
use crate::application::ports::{ChapterRecord, StoryRepositoryPort};
use crate::domain::structure::{reading_minutes, MAX_TOTAL_CHAPTERS, UNCLASSIFIED};

pub(crate) async fn require_chapter(
    repo: &dyn StoryRepositoryPort,
    chapter_id: Uuid,
) -> Result<ChapterRecord, ApplicationError> {
    repo.find_chapter(chapter_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Chapter", chapter_id))
}

fn default_title(number: u32) -> String {
    format!("第{}章", number)
}

/// 章节号上限，与章节计划的最大章节数一致
const MAX_CHAPTER_NUMBER: u32 = MAX_TOTAL_CHAPTERS;

/// 章节号在 1..=MAX_CHAPTER_NUMBER 内，且同一企划内唯一
fn ensure_number_free(
    chapters: &[ChapterRecord],
    number: u32,
    except: Option<Uuid>,
) -> Result<(), ApplicationError> {
    if number == 0 {
        return Err(ApplicationError::validation("章节号必须从 1 开始"));
    }
    if number > MAX_CHAPTER_NUMBER {
        return Err(ApplicationError::validation(format!(
            "章节号不能超过 {}: {}",
            MAX_CHAPTER_NUMBER, number
        )));
    }
    let taken = chapters
        .iter()
        .any(|c| c.number == number && Some(c.id) != except);
    if taken {
        return Err(ApplicationError::business_rule(format!(
            "第{}章已存在",
            number
        )));
    }
    Ok(())
}

// ============================================================================
// CreateChapter
// ============================================================================

pub struct CreateChapterHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl CreateChapterHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    /// 创建章节
    ///
    /// 未指定的字段按以下规则补全:
    /// - 章节号: 现有最大章节号 + 1
    /// - 结构标签: 有章节计划时取所在阶段名，否则为 "unclassified"
    /// - 估算: 有章节计划时取计划估算，否则为 0；
    ///   只给字数时阅读时长由字数推出
    pub async fn handle(&self, command: CreateChapter) -> Result<ChapterRecord, ApplicationError> {
        require_project(self.repo.as_ref(), command.project_id).await?;
        let existing = self.repo.find_chapters(command.project_id).await?;

        let number = match command.number {
            Some(number) => number,
            None => existing
                .iter()
                .map(|c| c.number)
                .max()
                .unwrap_or(0)
                .checked_add(1)
                .ok_or_else(|| ApplicationError::validation("章节号已达上限，请指定章节号"))?,
        };
        ensure_number_free(&existing, number, None)?;

        let (default_tag, default_estimate) = match &command.plan {
            Some(plan) => (
                plan.phase_name_of(number),
                Some(plan.chapter_estimate()),
            ),
            None => (UNCLASSIFIED, None),
        };

        let estimated_words = command
            .estimated_words
            .or(default_estimate.map(|e| e.estimated_words))
            .unwrap_or(0);
        let estimated_reading_time = match (command.estimated_reading_time, command.estimated_words)
        {
            (Some(minutes), _) => minutes,
            (None, Some(words)) => reading_minutes(words),
            (None, None) => default_estimate
                .map(|e| e.estimated_reading_time)
                .unwrap_or(0),
        };

        let title = command.title.trim();
        let now = Utc::now();
        let chapter = ChapterRecord {
            id: Uuid::new_v4(),
            project_id: command.project_id,
            number,
            title: if title.is_empty() {
                default_title(number)
            } else {
                title.to_string()
            },
            summary: command.summary,
            structure: command
                .structure
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| default_tag.to_string()),
            estimated_words,
            estimated_reading_time,
            created_at: now,
            updated_at: now,
        };

        self.repo.save_chapter(&chapter).await?;

        tracing::info!(
            project_id = %chapter.project_id,
            chapter_id = %chapter.id,
            number = chapter.number,
            structure = %chapter.structure,
            "Chapter created"
        );

        Ok(chapter)
    }
}

// ============================================================================
// UpdateChapter
// ============================================================================

pub struct UpdateChapterHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl UpdateChapterHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, command: UpdateChapter) -> Result<ChapterRecord, ApplicationError> {
        let mut chapter = require_chapter(self.repo.as_ref(), command.chapter_id).await?;

        if let Some(number) = command.number {
            if number != chapter.number {
                let siblings = self.repo.find_chapters(chapter.project_id).await?;
                ensure_number_free(&siblings, number, Some(chapter.id))?;
                chapter.number = number;
            }
        }
        if let Some(title) = command.title {
            let title = title.trim();
            chapter.title = if title.is_empty() {
                default_title(chapter.number)
            } else {
                title.to_string()
            };
        }
        if let Some(summary) = command.summary {
            chapter.summary = summary;
        }
        if let Some(structure) = command.structure {
            chapter.structure = structure;
        }
        if let Some(words) = command.estimated_words {
            chapter.estimated_words = words;
            if command.estimated_reading_time.is_none() {
                chapter.estimated_reading_time = reading_minutes(words);
            }
        }
        if let Some(minutes) = command.estimated_reading_time {
            chapter.estimated_reading_time = minutes;
        }
        chapter.updated_at = Utc::now();

        self.repo.save_chapter(&chapter).await?;

        tracing::info!(
            chapter_id = %chapter.id,
            number = chapter.number,
            "Chapter updated"
        );

        Ok(chapter)
    }
}

// ============================================================================
// DeleteChapter
// ============================================================================

pub struct DeleteChapterHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl DeleteChapterHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    /// 级联删除分集和草稿，返回被删除的章节
    pub async fn handle(&self, command: DeleteChapter) -> Result<ChapterRecord, ApplicationError> {
        let chapter = require_chapter(self.repo.as_ref(), command.chapter_id).await?;

        self.repo.delete_chapter(chapter.id).await?;

        tracing::info!(
            project_id = %chapter.project_id,
            chapter_id = %chapter.id,
            number = chapter.number,
            "Chapter deleted"
        );

        Ok(chapter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::handlers::CreateProjectHandler;
    use crate::application::commands::CreateProject;
    use crate::domain::structure::{ChapterPlan, StoryStructure};
    use crate::infrastructure::persistence::memory::InMemoryStoryRepository;

    async fn setup() -> (Arc<dyn StoryRepositoryPort>, Uuid) {
        let repo: Arc<dyn StoryRepositoryPort> = Arc::new(InMemoryStoryRepository::new());
        let project = CreateProjectHandler::new(repo.clone())
            .handle(CreateProject {
                title: "白い塔".to_string(),
                description: String::new(),
                genre: String::new(),
            })
            .await
            .unwrap();
        (repo, project.id)
    }

    fn bare(project_id: Uuid) -> CreateChapter {
        CreateChapter {
            project_id,
            number: None,
            title: String::new(),
            summary: String::new(),
            structure: None,
            estimated_words: None,
            estimated_reading_time: None,
            plan: None,
        }
    }

    #[tokio::test]
    async fn test_create_without_plan_is_unclassified() {
        let (repo, project_id) = setup().await;
        let chapter = CreateChapterHandler::new(repo)
            .handle(bare(project_id))
            .await
            .unwrap();

        assert_eq!(chapter.number, 1);
        assert_eq!(chapter.title, "第1章");
        assert_eq!(chapter.structure, UNCLASSIFIED);
        assert_eq!(chapter.estimated_words, 0);
        assert_eq!(chapter.estimated_reading_time, 0);
    }

    #[tokio::test]
    async fn test_create_with_plan_uses_phase_and_estimate() {
        let (repo, project_id) = setup().await;
        let plan = ChapterPlan::new(20, StoryStructure::Kishotenketsu, 50_000).unwrap();

        let chapter = CreateChapterHandler::new(repo)
            .handle(CreateChapter {
                number: Some(12),
                plan: Some(plan),
                ..bare(project_id)
            })
            .await
            .unwrap();

        assert_eq!(chapter.structure, "転");
        assert_eq!(chapter.estimated_words, 2500);
        assert_eq!(chapter.estimated_reading_time, 10);
    }

    #[tokio::test]
    async fn test_explicit_words_derive_reading_time() {
        let (repo, project_id) = setup().await;
        let chapter = CreateChapterHandler::new(repo)
            .handle(CreateChapter {
                estimated_words: Some(3001),
                ..bare(project_id)
            })
            .await
            .unwrap();
        assert_eq!(chapter.estimated_reading_time, 13);
    }

    #[tokio::test]
    async fn test_numbers_auto_increment_and_stay_unique() {
        let (repo, project_id) = setup().await;
        let handler = CreateChapterHandler::new(repo.clone());

        handler
            .handle(CreateChapter {
                number: Some(3),
                ..bare(project_id)
            })
            .await
            .unwrap();
        let next = handler.handle(bare(project_id)).await.unwrap();
        assert_eq!(next.number, 4);

        let duplicate = handler
            .handle(CreateChapter {
                number: Some(3),
                ..bare(project_id)
            })
            .await;
        assert!(matches!(
            duplicate,
            Err(ApplicationError::BusinessRuleViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_chapter_number_above_limit_is_rejected() {
        let (repo, project_id) = setup().await;
        let handler = CreateChapterHandler::new(repo.clone());

        for number in [MAX_CHAPTER_NUMBER + 1, u32::MAX] {
            let result = handler
                .handle(CreateChapter {
                    number: Some(number),
                    ..bare(project_id)
                })
                .await;
            assert!(matches!(result, Err(ApplicationError::ValidationError(_))));
        }
        assert!(repo.find_chapters(project_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_auto_number_after_highest_stored_number() {
        let (repo, project_id) = setup().await;
        let handler = CreateChapterHandler::new(repo.clone());

        let last = handler
            .handle(CreateChapter {
                number: Some(MAX_CHAPTER_NUMBER),
                ..bare(project_id)
            })
            .await
            .unwrap();
        assert_eq!(last.number, MAX_CHAPTER_NUMBER);

        let next = handler.handle(bare(project_id)).await;
        assert!(matches!(next, Err(ApplicationError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_auto_number_does_not_overflow_on_stored_max() {
        let (repo, project_id) = setup().await;
        let mut stored = CreateChapterHandler::new(repo.clone())
            .handle(bare(project_id))
            .await
            .unwrap();
        // 上限之前写入的数据
        stored.number = u32::MAX;
        repo.save_chapter(&stored).await.unwrap();

        let next = CreateChapterHandler::new(repo).handle(bare(project_id)).await;
        assert!(matches!(next, Err(ApplicationError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_update_chapter_number_conflict() {
        let (repo, project_id) = setup().await;
        let create = CreateChapterHandler::new(repo.clone());
        let first = create.handle(bare(project_id)).await.unwrap();
        let second = create.handle(bare(project_id)).await.unwrap();

        let handler = UpdateChapterHandler::new(repo.clone());
        let conflict = handler
            .handle(UpdateChapter {
                chapter_id: second.id,
                number: Some(first.number),
                title: None,
                summary: None,
                structure: None,
                estimated_words: None,
                estimated_reading_time: None,
            })
            .await;
        assert!(matches!(
            conflict,
            Err(ApplicationError::BusinessRuleViolation(_))
        ));

        let renamed = handler
            .handle(UpdateChapter {
                chapter_id: second.id,
                number: None,
                title: Some("決戦".to_string()),
                summary: None,
                structure: Some("結".to_string()),
                estimated_words: Some(500),
                estimated_reading_time: None,
            })
            .await
            .unwrap();
        assert_eq!(renamed.title, "決戦");
        assert_eq!(renamed.structure, "結");
        assert_eq!(renamed.estimated_reading_time, 2);
    }

    #[tokio::test]
    async fn test_delete_chapter_returns_record() {
        let (repo, project_id) = setup().await;
        let chapter = CreateChapterHandler::new(repo.clone())
            .handle(bare(project_id))
            .await
            .unwrap();

        let deleted = DeleteChapterHandler::new(repo.clone())
            .handle(DeleteChapter {
                chapter_id: chapter.id,
            })
            .await
            .unwrap();
        assert_eq!(deleted.project_id, project_id);
        assert!(repo.find_chapter(chapter.id).await.unwrap().is_none());
    }
}
