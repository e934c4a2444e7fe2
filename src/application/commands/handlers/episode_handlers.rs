//! Episode Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::chapter_handlers::require_chapter;
use crate::application::commands::{CreateEpisode, DeleteEpisode, UpdateEpisode};
use crate::application::error::ApplicationError;
use crate::application::ports::{EpisodeRecord, StoryRepositoryPort};

pub struct CreateEpisodeHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl CreateEpisodeHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    /// 未指定编号时接在现有最大编号之后
    pub async fn handle(&self, command: CreateEpisode) -> Result<EpisodeRecord, ApplicationError> {
        let chapter = require_chapter(self.repo.as_ref(), command.chapter_id).await?;

        let number = match command.number {
            Some(0) => return Err(ApplicationError::validation("分集编号必须从 1 开始")),
            Some(number) => number,
            None => {
                let existing = self.repo.find_episodes(chapter.id).await?;
                existing.iter().map(|e| e.number).max().unwrap_or(0) + 1
            }
        };

        let now = Utc::now();
        let episode = EpisodeRecord {
            id: Uuid::new_v4(),
            chapter_id: chapter.id,
            number,
            title: command.title.trim().to_string(),
            summary: command.summary,
            content: command.content,
            created_at: now,
            updated_at: now,
        };

        self.repo.save_episode(&episode).await?;

        tracing::info!(
            chapter_id = %episode.chapter_id,
            episode_id = %episode.id,
            number = episode.number,
            "Episode created"
        );

        Ok(episode)
    }
}

pub struct UpdateEpisodeHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl UpdateEpisodeHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, command: UpdateEpisode) -> Result<EpisodeRecord, ApplicationError> {
        let mut episode = self
            .repo
            .find_episode(command.episode_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Episode", command.episode_id))?;

        if let Some(number) = command.number {
            if number == 0 {
                return Err(ApplicationError::validation("分集编号必须从 1 开始"));
            }
            episode.number = number;
        }
        if let Some(title) = command.title {
            episode.title = title.trim().to_string();
        }
        if let Some(summary) = command.summary {
            episode.summary = summary;
        }
        if let Some(content) = command.content {
            episode.content = content;
        }
        episode.updated_at = Utc::now();

        self.repo.save_episode(&episode).await?;

        tracing::info!(episode_id = %episode.id, "Episode updated");

        Ok(episode)
    }
}

pub struct DeleteEpisodeHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl DeleteEpisodeHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, command: DeleteEpisode) -> Result<EpisodeRecord, ApplicationError> {
        let episode = self
            .repo
            .find_episode(command.episode_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Episode", command.episode_id))?;

        self.repo.delete_episode(episode.id).await?;

        tracing::info!(
            chapter_id = %episode.chapter_id,
            episode_id = %episode.id,
            "Episode deleted"
        );

        Ok(episode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::handlers::{CreateChapterHandler, CreateProjectHandler};
    use crate::application::commands::{CreateChapter, CreateProject};
    use crate::infrastructure::persistence::memory::InMemoryStoryRepository;

    async fn setup() -> (Arc<dyn StoryRepositoryPort>, Uuid) {
        let repo: Arc<dyn StoryRepositoryPort> = Arc::new(InMemoryStoryRepository::new());
        let project = CreateProjectHandler::new(repo.clone())
            .handle(CreateProject {
                title: "灯台守".to_string(),
                description: String::new(),
                genre: String::new(),
            })
            .await
            .unwrap();
        let chapter = CreateChapterHandler::new(repo.clone())
            .handle(CreateChapter {
                project_id: project.id,
                number: None,
                title: String::new(),
                summary: String::new(),
                structure: None,
                estimated_words: None,
                estimated_reading_time: None,
                plan: None,
            })
            .await
            .unwrap();
        (repo, chapter.id)
    }

    fn episode(chapter_id: Uuid, number: Option<u32>) -> CreateEpisode {
        CreateEpisode {
            chapter_id,
            number,
            title: "出会い".to_string(),
            summary: String::new(),
            content: String::new(),
        }
    }

    #[tokio::test]
    async fn test_episode_numbers_follow_existing() {
        let (repo, chapter_id) = setup().await;
        let handler = CreateEpisodeHandler::new(repo.clone());

        handler.handle(episode(chapter_id, Some(2))).await.unwrap();
        let next = handler.handle(episode(chapter_id, None)).await.unwrap();
        assert_eq!(next.number, 3);

        let zero = handler.handle(episode(chapter_id, Some(0))).await;
        assert!(matches!(zero, Err(ApplicationError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_create_episode_requires_chapter() {
        let (repo, _) = setup().await;
        let result = CreateEpisodeHandler::new(repo)
            .handle(episode(Uuid::new_v4(), None))
            .await;
        assert!(matches!(result, Err(ApplicationError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_and_delete_episode() {
        let (repo, chapter_id) = setup().await;
        let created = CreateEpisodeHandler::new(repo.clone())
            .handle(episode(chapter_id, None))
            .await
            .unwrap();

        let updated = UpdateEpisodeHandler::new(repo.clone())
            .handle(UpdateEpisode {
                episode_id: created.id,
                number: None,
                title: None,
                summary: Some("港で再会する".to_string()),
                content: None,
            })
            .await
            .unwrap();
        assert_eq!(updated.title, "出会い");
        assert_eq!(updated.summary, "港で再会する");

        DeleteEpisodeHandler::new(repo.clone())
            .handle(DeleteEpisode {
                episode_id: created.id,
            })
            .await
            .unwrap();
        assert!(repo.find_episodes(chapter_id).await.unwrap().is_empty());
    }
}
