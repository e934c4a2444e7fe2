//! Character Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::project_handlers::require_project;
use crate::application::commands::{
    CharacterFields, CreateCharacter, DeleteCharacter, UpdateCharacter,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{CharacterRecord, StoryRepositoryPort};

fn validated_name(fields: &CharacterFields) -> Result<String, ApplicationError> {
    let name = fields.name.trim();
    if name.is_empty() {
        return Err(ApplicationError::validation("角色名不能为空"));
    }
    Ok(name.to_string())
}

pub struct CreateCharacterHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl CreateCharacterHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    pub async fn handle(
        &self,
        command: CreateCharacter,
    ) -> Result<CharacterRecord, ApplicationError> {
        let name = validated_name(&command.fields)?;
        require_project(self.repo.as_ref(), command.project_id).await?;

        let now = Utc::now();
        let fields = command.fields;
        let character = CharacterRecord {
            id: Uuid::new_v4(),
            project_id: command.project_id,
            name,
            role: fields.role,
            personality: fields.personality,
            background: fields.background,
            appearance: fields.appearance,
            created_at: now,
            updated_at: now,
        };

        self.repo.save_character(&character).await?;

        tracing::info!(
            project_id = %character.project_id,
            character_id = %character.id,
            name = %character.name,
            "Character created"
        );

        Ok(character)
    }
}

pub struct UpdateCharacterHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl UpdateCharacterHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    /// 整体替换角色字段
    pub async fn handle(
        &self,
        command: UpdateCharacter,
    ) -> Result<CharacterRecord, ApplicationError> {
        let name = validated_name(&command.fields)?;
        let mut character = self
            .repo
            .find_character(command.character_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Character", command.character_id))?;

        let fields = command.fields;
        character.name = name;
        character.role = fields.role;
        character.personality = fields.personality;
        character.background = fields.background;
        character.appearance = fields.appearance;
        character.updated_at = Utc::now();

        self.repo.save_character(&character).await?;

        tracing::info!(character_id = %character.id, "Character updated");

        Ok(character)
    }
}

pub struct DeleteCharacterHandler {
    repo: Arc<dyn StoryRepositoryPort>,
}

impl DeleteCharacterHandler {
    pub fn new(repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { repo }
    }

    /// 返回被删除角色，调用方据此得知所属企划
    pub async fn handle(
        &self,
        command: DeleteCharacter,
    ) -> Result<CharacterRecord, ApplicationError> {
        let character = self
            .repo
            .find_character(command.character_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Character", command.character_id))?;

        self.repo.delete_character(character.id).await?;

        tracing::info!(
            project_id = %character.project_id,
            character_id = %character.id,
            "Character deleted"
        );

        Ok(character)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::handlers::CreateProjectHandler;
    use crate::application::commands::CreateProject;
    use crate::infrastructure::persistence::memory::InMemoryStoryRepository;

    async fn setup() -> (Arc<dyn StoryRepositoryPort>, Uuid) {
        let repo: Arc<dyn StoryRepositoryPort> = Arc::new(InMemoryStoryRepository::new());
        let project = CreateProjectHandler::new(repo.clone())
            .handle(CreateProject {
                title: "星の海".to_string(),
                description: String::new(),
                genre: String::new(),
            })
            .await
            .unwrap();
        (repo, project.id)
    }

    fn fields(name: &str) -> CharacterFields {
        CharacterFields {
            name: name.to_string(),
            role: "主人公".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_update_character() {
        let (repo, project_id) = setup().await;

        let created = CreateCharacterHandler::new(repo.clone())
            .handle(CreateCharacter {
                project_id,
                fields: fields(" 葵 "),
            })
            .await
            .unwrap();
        assert_eq!(created.name, "葵");

        let updated = UpdateCharacterHandler::new(repo.clone())
            .handle(UpdateCharacter {
                character_id: created.id,
                fields: CharacterFields {
                    personality: "頑固".to_string(),
                    ..fields("葵")
                },
            })
            .await
            .unwrap();
        assert_eq!(updated.personality, "頑固");
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_create_character_requires_project() {
        let (repo, _) = setup().await;
        let result = CreateCharacterHandler::new(repo)
            .handle(CreateCharacter {
                project_id: Uuid::new_v4(),
                fields: fields("葵"),
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_create_character_requires_name() {
        let (repo, project_id) = setup().await;
        let result = CreateCharacterHandler::new(repo)
            .handle(CreateCharacter {
                project_id,
                fields: fields(""),
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_delete_character() {
        let (repo, project_id) = setup().await;
        let created = CreateCharacterHandler::new(repo.clone())
            .handle(CreateCharacter {
                project_id,
                fields: fields("葵"),
            })
            .await
            .unwrap();

        let handler = DeleteCharacterHandler::new(repo.clone());
        let deleted = handler
            .handle(DeleteCharacter {
                character_id: created.id,
            })
            .await
            .unwrap();
        assert_eq!(deleted.project_id, project_id);

        let again = handler
            .handle(DeleteCharacter {
                character_id: created.id,
            })
            .await;
        assert!(matches!(again, Err(ApplicationError::NotFound { .. })));
    }
}
