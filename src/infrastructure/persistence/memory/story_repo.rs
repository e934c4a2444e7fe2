//! In-Memory Story Repository

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::{
    ChapterRecord, CharacterRecord, DraftRecord, EpisodeRecord, PlotRecord, ProjectRecord,
    RepositoryError, StoryRepositoryPort, SynopsisRecord,
};

/// 内存仓储
///
/// plots / synopses 以 project_id 为键，drafts 以 chapter_id 为键
#[derive(Default)]
pub struct InMemoryStoryRepository {
    projects: DashMap<Uuid, ProjectRecord>,
    characters: DashMap<Uuid, CharacterRecord>,
    plots: DashMap<Uuid, PlotRecord>,
    synopses: DashMap<Uuid, SynopsisRecord>,
    chapters: DashMap<Uuid, ChapterRecord>,
    episodes: DashMap<Uuid, EpisodeRecord>,
    drafts: DashMap<Uuid, DraftRecord>,
}

impl InMemoryStoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn remove_chapter_cascade(&self, chapter_id: Uuid) {
        self.chapters.remove(&chapter_id);
        self.episodes.retain(|_, e| e.chapter_id != chapter_id);
        self.drafts.remove(&chapter_id);
    }
}

#[async_trait]
impl StoryRepositoryPort for InMemoryStoryRepository {
    async fn save_project(&self, project: &ProjectRecord) -> Result<(), RepositoryError> {
        self.projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<ProjectRecord>, RepositoryError> {
        Ok(self.projects.get(&id).map(|p| p.clone()))
    }

    async fn find_all_projects(&self) -> Result<Vec<ProjectRecord>, RepositoryError> {
        let mut projects: Vec<ProjectRecord> =
            self.projects.iter().map(|p| p.value().clone()).collect();
        projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(projects)
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), RepositoryError> {
        // 先收集章节 ID，避免持有 DashMap 引用时修改
        let chapter_ids: Vec<Uuid> = self
            .chapters
            .iter()
            .filter(|c| c.project_id == id)
            .map(|c| c.id)
            .collect();
        for chapter_id in chapter_ids {
            self.remove_chapter_cascade(chapter_id);
        }

        self.characters.retain(|_, c| c.project_id != id);
        self.plots.remove(&id);
        self.synopses.remove(&id);
        self.projects.remove(&id);
        Ok(())
    }

    async fn save_character(&self, character: &CharacterRecord) -> Result<(), RepositoryError> {
        self.characters.insert(character.id, character.clone());
        Ok(())
    }

    async fn find_character(&self, id: Uuid) -> Result<Option<CharacterRecord>, RepositoryError> {
        Ok(self.characters.get(&id).map(|c| c.clone()))
    }

    async fn find_characters(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<CharacterRecord>, RepositoryError> {
        let mut characters: Vec<CharacterRecord> = self
            .characters
            .iter()
            .filter(|c| c.project_id == project_id)
            .map(|c| c.value().clone())
            .collect();
        characters.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(characters)
    }

    async fn delete_character(&self, id: Uuid) -> Result<(), RepositoryError> {
        self.characters.remove(&id);
        Ok(())
    }

    async fn save_plot(&self, plot: &PlotRecord) -> Result<(), RepositoryError> {
        self.plots.insert(plot.project_id, plot.clone());
        Ok(())
    }

    async fn find_plot(&self, project_id: Uuid) -> Result<Option<PlotRecord>, RepositoryError> {
        Ok(self.plots.get(&project_id).map(|p| p.clone()))
    }

    async fn save_synopsis(&self, synopsis: &SynopsisRecord) -> Result<(), RepositoryError> {
        self.synopses.insert(synopsis.project_id, synopsis.clone());
        Ok(())
    }

    async fn find_synopsis(
        &self,
        project_id: Uuid,
    ) -> Result<Option<SynopsisRecord>, RepositoryError> {
        Ok(self.synopses.get(&project_id).map(|s| s.clone()))
    }

    async fn save_chapter(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError> {
        self.chapters.insert(chapter.id, chapter.clone());
        Ok(())
    }

    async fn find_chapter(&self, id: Uuid) -> Result<Option<ChapterRecord>, RepositoryError> {
        Ok(self.chapters.get(&id).map(|c| c.clone()))
    }

    async fn find_chapters(&self, project_id: Uuid) -> Result<Vec<ChapterRecord>, RepositoryError> {
        let mut chapters: Vec<ChapterRecord> = self
            .chapters
            .iter()
            .filter(|c| c.project_id == project_id)
            .map(|c| c.value().clone())
            .collect();
        chapters.sort_by_key(|c| c.number);
        Ok(chapters)
    }

    async fn delete_chapter(&self, id: Uuid) -> Result<(), RepositoryError> {
        self.remove_chapter_cascade(id);
        Ok(())
    }

    async fn save_episode(&self, episode: &EpisodeRecord) -> Result<(), RepositoryError> {
        self.episodes.insert(episode.id, episode.clone());
        Ok(())
    }

    async fn find_episode(&self, id: Uuid) -> Result<Option<EpisodeRecord>, RepositoryError> {
        Ok(self.episodes.get(&id).map(|e| e.clone()))
    }

    async fn find_episodes(&self, chapter_id: Uuid) -> Result<Vec<EpisodeRecord>, RepositoryError> {
        let mut episodes: Vec<EpisodeRecord> = self
            .episodes
            .iter()
            .filter(|e| e.chapter_id == chapter_id)
            .map(|e| e.value().clone())
            .collect();
        episodes.sort_by_key(|e| e.number);
        Ok(episodes)
    }

    async fn delete_episode(&self, id: Uuid) -> Result<(), RepositoryError> {
        self.episodes.remove(&id);
        Ok(())
    }

    async fn save_draft(&self, draft: &DraftRecord) -> Result<(), RepositoryError> {
        self.drafts.insert(draft.chapter_id, draft.clone());
        Ok(())
    }

    async fn find_draft(&self, chapter_id: Uuid) -> Result<Option<DraftRecord>, RepositoryError> {
        Ok(self.drafts.get(&chapter_id).map(|d| d.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::WritingStep;
    use chrono::Utc;

    fn project() -> ProjectRecord {
        let now = Utc::now();
        ProjectRecord {
            id: Uuid::new_v4(),
            title: "テスト".to_string(),
            description: String::new(),
            genre: String::new(),
            current_step: WritingStep::Characters,
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
            structure: "起".to_string(),
            estimated_words: 0,
            estimated_reading_time: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_chapters_are_ordered_by_number() {
        let repo = InMemoryStoryRepository::new();
        let p = project();
        repo.save_project(&p).await.unwrap();
        for n in [3, 1, 2] {
            repo.save_chapter(&chapter(p.id, n)).await.unwrap();
        }

        let numbers: Vec<u32> = repo
            .find_chapters(p.id)
            .await
            .unwrap()
            .iter()
            .map(|c| c.number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_delete_project_cascades() {
        let repo = InMemoryStoryRepository::new();
        let p = project();
        let other = project();
        repo.save_project(&p).await.unwrap();
        repo.save_project(&other).await.unwrap();

        let c = chapter(p.id, 1);
        let kept = chapter(other.id, 1);
        repo.save_chapter(&c).await.unwrap();
        repo.save_chapter(&kept).await.unwrap();
        repo.save_draft(&DraftRecord {
            chapter_id: c.id,
            content: "本文".to_string(),
            char_count: 2,
            updated_at: Utc::now(),
        })
        .await
        .unwrap();

        repo.delete_project(p.id).await.unwrap();

        assert!(repo.find_project(p.id).await.unwrap().is_none());
        assert!(repo.find_chapter(c.id).await.unwrap().is_none());
        assert!(repo.find_draft(c.id).await.unwrap().is_none());
        assert!(repo.find_chapter(kept.id).await.unwrap().is_some());
    }
}
