//! Character Commands

use uuid::Uuid;

/// 角色字段
#[derive(Debug, Clone, Default)]
pub struct CharacterFields {
    pub name: String,
    pub role: String,
    pub personality: String,
    pub background: String,
    pub appearance: String,
}

#[derive(Debug, Clone)]
pub struct CreateCharacter {
    pub project_id: Uuid,
    pub fields: CharacterFields,
}

/// 整体替换角色字段
#[derive(Debug, Clone)]
pub struct UpdateCharacter {
    pub character_id: Uuid,
    pub fields: CharacterFields,
}

#[derive(Debug, Clone)]
pub struct DeleteCharacter {
    pub character_id: Uuid,
}
