//! Project Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{CreateProject, DeleteProject, SetProjectStep, UpdateProject};
use crate::application::error::ApplicationError;
use crate::application::ports::{ProjectRecord, StoryRepositoryPort};
use crate::domain::project::{Genre, Title, WritingStep};

/// 查找企划，不存在时返回 NotFound
pub(crate) async fn require_project(
    repo: &dyn StoryRepositoryPort,
    project_id: Uuid,
) -> Result<ProjectRecord, ApplicationError> {
    repo.find_project(project_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Project", project_id))
}

// ============================================================================
// CreateProject
// ============================================================================

pub struct CreateProjectHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl CreateProjectHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, command: CreateProject) -> Result<ProjectRecord, ApplicationError> {
        let title = Title::new(command.title)?;
        let now = Utc::now();

        let project = ProjectRecord {
            id: Uuid::new_v4(),
            title: title.into_inner(),
            description: command.description.trim().to_string(),
            genre: Genre::new(command.genre).as_str().to_string(),
            current_step: WritingStep::default(),
            created_at: now,
            updated_at: now,
        };

        self.repo.save_project(&project).await?;

        tracing::info!(
            project_id = %project.id,
            title = %project.title,
            "Project created"
        );

        Ok(project)
    }
}

// ============================================================================
// UpdateProject
// ============================================================================

pub struct UpdateProjectHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl UpdateProjectHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, command: UpdateProject) -> Result<ProjectRecord, ApplicationError> {
        let mut project = require_project(self.repo.as_ref(), command.project_id).await?;

        if let Some(title) = command.title {
            project.title = Title::new(title)?.into_inner();
        }
        if let Some(description) = command.description {
            project.description = description.trim().to_string();
        }
        if let Some(genre) = command.genre {
            project.genre = Genre::new(genre).as_str().to_string();
        }
        project.updated_at = Utc::now();

        self.repo.save_project(&project).await?;

        tracing::info!(project_id = %project.id, "Project updated");

        Ok(project)
    }
}

// ============================================================================
// SetProjectStep
// ============================================================================

pub struct SetProjectStepHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl SetProjectStepHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, command: SetProjectStep) -> Result<ProjectRecord, ApplicationError> {
        let step = WritingStep::from_number(command.step)?;
        let mut project = require_project(self.repo.as_ref(), command.project_id).await?;

        let previous = project.current_step;
        project.current_step = step;
        project.updated_at = Utc::now();
        self.repo.save_project(&project).await?;

        tracing::info!(
            project_id = %project.id,
            from = previous.as_str(),
            to = step.as_str(),
            "Project step changed"
        );

        Ok(project)
    }
}

// ============================================================================
// DeleteProject
// ============================================================================

pub struct DeleteProjectHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl DeleteProjectHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, command: DeleteProject) -> Result<(), ApplicationError> {
        let project = require_project(self.repo.as_ref(), command.project_id).await?;

        self.repo.delete_project(project.id).await?;

        tracing::info!(
            project_id = %project.id,
            title = %project.title,
            "Project deleted"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::memory::InMemoryStoryRepository;

    fn repo() -> Arc<dyn StoryRepositoryPort> {
        Arc::new(InMemoryStoryRepository::new())
    }

    fn create(title: &str) -> CreateProject {
        CreateProject {
            title: title.to_string(),
            description: " 海辺の町の話 ".to_string(),
            genre: "ミステリー".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_project_starts_at_first_step() {
        let repo = repo();
        let project = CreateProjectHandler::new(repo.clone())
            .handle(create("潮騒"))
            .await
            .unwrap();

        assert_eq!(project.current_step, WritingStep::Characters);
        assert_eq!(project.description, "海辺の町の話");
        assert!(repo.find_project(project.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_project_rejects_empty_title() {
        let result = CreateProjectHandler::new(repo()).handle(create("  ")).await;
        assert!(matches!(result, Err(ApplicationError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_update_keeps_unset_fields() {
        let repo = repo();
        let project = CreateProjectHandler::new(repo.clone())
            .handle(create("潮騒"))
            .await
            .unwrap();

        let updated = UpdateProjectHandler::new(repo.clone())
            .handle(UpdateProject {
                project_id: project.id,
                title: None,
                description: None,
                genre: Some("青春".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(updated.title, "潮騒");
        assert_eq!(updated.genre, "青春");
    }

    #[tokio::test]
    async fn test_set_step() {
        let repo = repo();
        let project = CreateProjectHandler::new(repo.clone())
            .handle(create("潮騒"))
            .await
            .unwrap();
        let handler = SetProjectStepHandler::new(repo.clone());

        let updated = handler
            .handle(SetProjectStep {
                project_id: project.id,
                step: 4,
            })
            .await
            .unwrap();
        assert_eq!(updated.current_step, WritingStep::Chapters);

        let invalid = handler
            .handle(SetProjectStep {
                project_id: project.id,
                step: 7,
            })
            .await;
        assert!(matches!(invalid, Err(ApplicationError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_project() {
        let result = DeleteProjectHandler::new(repo())
            .handle(DeleteProject {
                project_id: Uuid::new_v4(),
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::NotFound { .. })));
    }
}
