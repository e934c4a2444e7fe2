//! SQLite Story Repository

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{
    ChapterRecord, CharacterRecord, DraftRecord, EpisodeRecord, PlotRecord, ProjectRecord,
    RepositoryError, StoryRepositoryPort, SynopsisRecord,
};
use crate::domain::project::WritingStep;
use crate::domain::structure::StructureError;

/// SQLite Story Repository
pub struct SqliteStoryRepository {
    pool: DbPool,
}

impl SqliteStoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

// 固定精度，保证按字符串排序与时间顺序一致
fn timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
        .with_timezone(&Utc))
}

fn parse_uuid(value: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(value).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

fn parse_u32(value: i64) -> Result<u32, RepositoryError> {
    u32::try_from(value).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

fn db_error(e: sqlx::Error) -> RepositoryError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::Duplicate(db.message().to_string())
        }
        _ => RepositoryError::DatabaseError(e.to_string()),
    }
}

// ============================================================================
// Rows
// ============================================================================

#[derive(FromRow)]
struct ProjectRow {
    id: String,
    title: String,
    description: String,
    genre: String,
    current_step: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ProjectRow> for ProjectRecord {
    type Error = RepositoryError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(ProjectRecord {
            id: parse_uuid(&row.id)?,
            title: row.title,
            description: row.description,
            genre: row.genre,
            current_step: WritingStep::from_number(row.current_step)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct CharacterRow {
    id: String,
    project_id: String,
    name: String,
    role: String,
    personality: String,
    background: String,
    appearance: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<CharacterRow> for CharacterRecord {
    type Error = RepositoryError;

    fn try_from(row: CharacterRow) -> Result<Self, Self::Error> {
        Ok(CharacterRecord {
            id: parse_uuid(&row.id)?,
            project_id: parse_uuid(&row.project_id)?,
            name: row.name,
            role: row.role,
            personality: row.personality,
            background: row.background,
            appearance: row.appearance,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct PlotRow {
    project_id: String,
    theme: String,
    setting: String,
    hook: String,
    protagonist_goal: String,
    main_conflict: String,
    ending: String,
    structure: String,
    updated_at: String,
}

impl TryFrom<PlotRow> for PlotRecord {
    type Error = RepositoryError;

    fn try_from(row: PlotRow) -> Result<Self, Self::Error> {
        Ok(PlotRecord {
            project_id: parse_uuid(&row.project_id)?,
            theme: row.theme,
            setting: row.setting,
            hook: row.hook,
            protagonist_goal: row.protagonist_goal,
            main_conflict: row.main_conflict,
            ending: row.ending,
            structure: row
                .structure
                .parse()
                .map_err(|e: StructureError| {
                    RepositoryError::SerializationError(e.to_string())
                })?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct SynopsisRow {
    project_id: String,
    content: String,
    updated_at: String,
}

impl TryFrom<SynopsisRow> for SynopsisRecord {
    type Error = RepositoryError;

    fn try_from(row: SynopsisRow) -> Result<Self, Self::Error> {
        Ok(SynopsisRecord {
            project_id: parse_uuid(&row.project_id)?,
            content: row.content,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct ChapterRow {
    id: String,
    project_id: String,
    number: i64,
    title: String,
    summary: String,
    structure: String,
    estimated_words: i64,
    estimated_reading_time: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ChapterRow> for ChapterRecord {
    type Error = RepositoryError;

    fn try_from(row: ChapterRow) -> Result<Self, Self::Error> {
        Ok(ChapterRecord {
            id: parse_uuid(&row.id)?,
            project_id: parse_uuid(&row.project_id)?,
            number: parse_u32(row.number)?,
            title: row.title,
            summary: row.summary,
            structure: row.structure,
            estimated_words: parse_u32(row.estimated_words)?,
            estimated_reading_time: parse_u32(row.estimated_reading_time)?,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct EpisodeRow {
    id: String,
    chapter_id: String,
    number: i64,
    title: String,
    summary: String,
    content: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<EpisodeRow> for EpisodeRecord {
    type Error = RepositoryError;

    fn try_from(row: EpisodeRow) -> Result<Self, Self::Error> {
        Ok(EpisodeRecord {
            id: parse_uuid(&row.id)?,
            chapter_id: parse_uuid(&row.chapter_id)?,
            number: parse_u32(row.number)?,
            title: row.title,
            summary: row.summary,
            content: row.content,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct DraftRow {
    chapter_id: String,
    content: String,
    char_count: i64,
    updated_at: String,
}

impl TryFrom<DraftRow> for DraftRecord {
    type Error = RepositoryError;

    fn try_from(row: DraftRow) -> Result<Self, Self::Error> {
        Ok(DraftRecord {
            chapter_id: parse_uuid(&row.chapter_id)?,
            content: row.content,
            char_count: row.char_count.max(0) as usize,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

const PROJECT_COLUMNS: &str =
    "id, title, description, genre, current_step, created_at, updated_at";
const CHARACTER_COLUMNS: &str =
    "id, project_id, name, role, personality, background, appearance, created_at, updated_at";
const PLOT_COLUMNS: &str =
    "project_id, theme, setting, hook, protagonist_goal, main_conflict, ending, structure, updated_at";
const CHAPTER_COLUMNS: &str = "id, project_id, number, title, summary, structure, estimated_words, estimated_reading_time, created_at, updated_at";
const EPISODE_COLUMNS: &str =
    "id, chapter_id, number, title, summary, content, created_at, updated_at";

#[async_trait]
impl StoryRepositoryPort for SqliteStoryRepository {
    // ---------- Project ----------

    async fn save_project(&self, project: &ProjectRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO projects (id, title, description, genre, current_step, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                genre = excluded.genre,
                current_step = excluded.current_step,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(project.id.to_string())
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.genre)
        .bind(i64::from(project.current_step.number()))
        .bind(timestamp(&project.created_at))
        .bind(timestamp(&project.updated_at))
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<ProjectRecord>, RepositoryError> {
        let row: Option<ProjectRow> = sqlx::query_as(&format!(
            "SELECT {} FROM projects WHERE id = ?",
            PROJECT_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(ProjectRecord::try_from).transpose()
    }

    async fn find_all_projects(&self) -> Result<Vec<ProjectRecord>, RepositoryError> {
        let rows: Vec<ProjectRow> = sqlx::query_as(&format!(
            "SELECT {} FROM projects ORDER BY updated_at DESC",
            PROJECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(ProjectRecord::try_from).collect()
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), RepositoryError> {
        // 使用事务确保原子性
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        let id = id.to_string();

        sqlx::query(
            "DELETE FROM drafts WHERE chapter_id IN (SELECT id FROM chapters WHERE project_id = ?)",
        )
        .bind(&id)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        sqlx::query(
            "DELETE FROM episodes WHERE chapter_id IN (SELECT id FROM chapters WHERE project_id = ?)",
        )
        .bind(&id)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        for table in ["chapters", "characters", "plots", "synopses"] {
            sqlx::query(&format!("DELETE FROM {} WHERE project_id = ?", table))
                .bind(&id)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        Ok(())
    }

    // ---------- Character ----------

    async fn save_character(&self, character: &CharacterRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO characters (id, project_id, name, role, personality, background, appearance, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                role = excluded.role,
                personality = excluded.personality,
                background = excluded.background,
                appearance = excluded.appearance,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(character.id.to_string())
        .bind(character.project_id.to_string())
        .bind(&character.name)
        .bind(&character.role)
        .bind(&character.personality)
        .bind(&character.background)
        .bind(&character.appearance)
        .bind(timestamp(&character.created_at))
        .bind(timestamp(&character.updated_at))
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn find_character(&self, id: Uuid) -> Result<Option<CharacterRecord>, RepositoryError> {
        let row: Option<CharacterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM characters WHERE id = ?",
            CHARACTER_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(CharacterRecord::try_from).transpose()
    }

    async fn find_characters(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<CharacterRecord>, RepositoryError> {
        let rows: Vec<CharacterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM characters WHERE project_id = ? ORDER BY created_at ASC",
            CHARACTER_COLUMNS
        ))
        .bind(project_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(CharacterRecord::try_from).collect()
    }

    async fn delete_character(&self, id: Uuid) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM characters WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(())
    }

    // ---------- Plot / Synopsis ----------

    async fn save_plot(&self, plot: &PlotRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO plots (project_id, theme, setting, hook, protagonist_goal, main_conflict, ending, structure, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(project_id) DO UPDATE SET
                theme = excluded.theme,
                setting = excluded.setting,
                hook = excluded.hook,
                protagonist_goal = excluded.protagonist_goal,
                main_conflict = excluded.main_conflict,
                ending = excluded.ending,
                structure = excluded.structure,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(plot.project_id.to_string())
        .bind(&plot.theme)
        .bind(&plot.setting)
        .bind(&plot.hook)
        .bind(&plot.protagonist_goal)
        .bind(&plot.main_conflict)
        .bind(&plot.ending)
        .bind(plot.structure.as_str())
        .bind(timestamp(&plot.updated_at))
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn find_plot(&self, project_id: Uuid) -> Result<Option<PlotRecord>, RepositoryError> {
        let row: Option<PlotRow> = sqlx::query_as(&format!(
            "SELECT {} FROM plots WHERE project_id = ?",
            PLOT_COLUMNS
        ))
        .bind(project_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(PlotRecord::try_from).transpose()
    }

    async fn save_synopsis(&self, synopsis: &SynopsisRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO synopses (project_id, content, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(project_id) DO UPDATE SET
                content = excluded.content,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(synopsis.project_id.to_string())
        .bind(&synopsis.content)
        .bind(timestamp(&synopsis.updated_at))
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn find_synopsis(
        &self,
        project_id: Uuid,
    ) -> Result<Option<SynopsisRecord>, RepositoryError> {
        let row: Option<SynopsisRow> = sqlx::query_as(
            "SELECT project_id, content, updated_at FROM synopses WHERE project_id = ?",
        )
        .bind(project_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(SynopsisRecord::try_from).transpose()
    }

    // ---------- Chapter ----------

    async fn save_chapter(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO chapters (id, project_id, number, title, summary, structure, estimated_words, estimated_reading_time, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                number = excluded.number,
                title = excluded.title,
                summary = excluded.summary,
                structure = excluded.structure,
                estimated_words = excluded.estimated_words,
                estimated_reading_time = excluded.estimated_reading_time,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(chapter.id.to_string())
        .bind(chapter.project_id.to_string())
        .bind(i64::from(chapter.number))
        .bind(&chapter.title)
        .bind(&chapter.summary)
        .bind(&chapter.structure)
        .bind(i64::from(chapter.estimated_words))
        .bind(i64::from(chapter.estimated_reading_time))
        .bind(timestamp(&chapter.created_at))
        .bind(timestamp(&chapter.updated_at))
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn find_chapter(&self, id: Uuid) -> Result<Option<ChapterRecord>, RepositoryError> {
        let row: Option<ChapterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM chapters WHERE id = ?",
            CHAPTER_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(ChapterRecord::try_from).transpose()
    }

    async fn find_chapters(&self, project_id: Uuid) -> Result<Vec<ChapterRecord>, RepositoryError> {
        let rows: Vec<ChapterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM chapters WHERE project_id = ? ORDER BY number ASC",
            CHAPTER_COLUMNS
        ))
        .bind(project_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(ChapterRecord::try_from).collect()
    }

    async fn delete_chapter(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        let id = id.to_string();

        sqlx::query("DELETE FROM drafts WHERE chapter_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        sqlx::query("DELETE FROM episodes WHERE chapter_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        sqlx::query("DELETE FROM chapters WHERE id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        Ok(())
    }

    // ---------- Episode ----------

    async fn save_episode(&self, episode: &EpisodeRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO episodes (id, chapter_id, number, title, summary, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                number = excluded.number,
                title = excluded.title,
                summary = excluded.summary,
                content = excluded.content,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(episode.id.to_string())
        .bind(episode.chapter_id.to_string())
        .bind(i64::from(episode.number))
        .bind(&episode.title)
        .bind(&episode.summary)
        .bind(&episode.content)
        .bind(timestamp(&episode.created_at))
        .bind(timestamp(&episode.updated_at))
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn find_episode(&self, id: Uuid) -> Result<Option<EpisodeRecord>, RepositoryError> {
        let row: Option<EpisodeRow> = sqlx::query_as(&format!(
            "SELECT {} FROM episodes WHERE id = ?",
            EPISODE_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(EpisodeRecord::try_from).transpose()
    }

    async fn find_episodes(&self, chapter_id: Uuid) -> Result<Vec<EpisodeRecord>, RepositoryError> {
        let rows: Vec<EpisodeRow> = sqlx::query_as(&format!(
            "SELECT {} FROM episodes WHERE chapter_id = ? ORDER BY number ASC, created_at ASC",
            EPISODE_COLUMNS
        ))
        .bind(chapter_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(EpisodeRecord::try_from).collect()
    }

    async fn delete_episode(&self, id: Uuid) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM episodes WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(())
    }

    // ---------- Draft ----------

    async fn save_draft(&self, draft: &DraftRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO drafts (chapter_id, content, char_count, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(chapter_id) DO UPDATE SET
                content = excluded.content,
                char_count = excluded.char_count,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(draft.chapter_id.to_string())
        .bind(&draft.content)
        .bind(draft.char_count as i64)
        .bind(timestamp(&draft.updated_at))
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn find_draft(&self, chapter_id: Uuid) -> Result<Option<DraftRecord>, RepositoryError> {
        let row: Option<DraftRow> = sqlx::query_as(
            "SELECT chapter_id, content, char_count, updated_at FROM drafts WHERE chapter_id = ?",
        )
        .bind(chapter_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(DraftRecord::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::structure::StoryStructure;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};
    use chrono::Duration;

    async fn repo() -> SqliteStoryRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteStoryRepository::new(pool)
    }

    fn project(title: &str) -> ProjectRecord {
        let now = Utc::now();
        ProjectRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: "説明".to_string(),
            genre: "SF".to_string(),
            current_step: WritingStep::Plot,
            created_at: now,
            updated_at: now,
        }
    }

    fn chapter(project_id: Uuid, number: u32) -> ChapterRecord {
        let now = Utc::now();
        ChapterRecord {
            id: Uuid::new_v4(),
            project_id,
            number,
            title: format!("第{}章", number),
            summary: String::new(),
            structure: "承".to_string(),
            estimated_words: 2500,
            estimated_reading_time: 10,
            created_at: now,
            updated_at: now,
        }
    }

    fn episode(chapter_id: Uuid, number: u32) -> EpisodeRecord {
        let now = Utc::now();
        EpisodeRecord {
            id: Uuid::new_v4(),
            chapter_id,
            number,
            title: "場面".to_string(),
            summary: String::new(),
            content: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_project_round_trip_and_order() {
        let repo = repo().await;
        let older = ProjectRecord {
            updated_at: Utc::now() - Duration::hours(1),
            ..project("古い")
        };
        let newer = project("新しい");
        repo.save_project(&older).await.unwrap();
        repo.save_project(&newer).await.unwrap();

        let found = repo.find_project(newer.id).await.unwrap().unwrap();
        assert_eq!(found.title, "新しい");
        assert_eq!(found.current_step, WritingStep::Plot);

        let titles: Vec<String> = repo
            .find_all_projects()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["新しい", "古い"]);
    }

    #[tokio::test]
    async fn test_plot_upsert() {
        let repo = repo().await;
        let p = project("星");
        repo.save_project(&p).await.unwrap();

        let mut plot = PlotRecord {
            project_id: p.id,
            theme: "孤独".to_string(),
            setting: String::new(),
            hook: String::new(),
            protagonist_goal: String::new(),
            main_conflict: String::new(),
            ending: String::new(),
            structure: StoryStructure::ThreeAct,
            updated_at: Utc::now(),
        };
        repo.save_plot(&plot).await.unwrap();
        plot.theme = "連帯".to_string();
        repo.save_plot(&plot).await.unwrap();

        let stored = repo.find_plot(p.id).await.unwrap().unwrap();
        assert_eq!(stored.theme, "連帯");
        assert_eq!(stored.structure, StoryStructure::ThreeAct);
        assert!(repo.find_synopsis(p.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_chapter_number() {
        let repo = repo().await;
        let p = project("塔");
        repo.save_project(&p).await.unwrap();

        repo.save_chapter(&chapter(p.id, 1)).await.unwrap();
        let result = repo.save_chapter(&chapter(p.id, 1)).await;
        assert!(matches!(result, Err(RepositoryError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_chapters_and_episodes_sorted() {
        let repo = repo().await;
        let p = project("港");
        repo.save_project(&p).await.unwrap();

        let c2 = chapter(p.id, 2);
        let c1 = chapter(p.id, 1);
        repo.save_chapter(&c2).await.unwrap();
        repo.save_chapter(&c1).await.unwrap();

        let numbers: Vec<u32> = repo
            .find_chapters(p.id)
            .await
            .unwrap()
            .iter()
            .map(|c| c.number)
            .collect();
        assert_eq!(numbers, vec![1, 2]);

        repo.save_episode(&episode(c1.id, 3)).await.unwrap();
        repo.save_episode(&episode(c1.id, 1)).await.unwrap();
        let episodes = repo.find_episodes(c1.id).await.unwrap();
        assert_eq!(episodes[0].number, 1);
        assert_eq!(episodes[1].number, 3);
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let repo = repo().await;
        let p = project("森");
        repo.save_project(&p).await.unwrap();
        let c = chapter(p.id, 1);
        repo.save_chapter(&c).await.unwrap();
        let e = episode(c.id, 1);
        repo.save_episode(&e).await.unwrap();
        repo.save_draft(&DraftRecord {
            chapter_id: c.id,
            content: "森は静かだった。".to_string(),
            char_count: 8,
            updated_at: Utc::now(),
        })
        .await
        .unwrap();

        repo.delete_chapter(c.id).await.unwrap();
        assert!(repo.find_episode(e.id).await.unwrap().is_none());
        assert!(repo.find_draft(c.id).await.unwrap().is_none());

        let c = chapter(p.id, 1);
        repo.save_chapter(&c).await.unwrap();
        repo.delete_project(p.id).await.unwrap();
        assert!(repo.find_project(p.id).await.unwrap().is_none());
        assert!(repo.find_chapter(c.id).await.unwrap().is_none());

        // 不存在的记录删除不报错
        repo.delete_project(p.id).await.unwrap();
    }
}
