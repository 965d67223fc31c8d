//! Chapter Query Handlers

use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{ChapterSummary, NovelRepositoryPort};
use crate::application::queries::{GetChapter, ListChapters};

/// 章节内容响应
#[derive(Debug, Clone)]
pub struct ChapterResponse {
    pub index: usize,
    pub total: usize,
    pub title: String,
    pub content: String,
}

/// 章节目录响应
#[derive(Debug, Clone)]
pub struct ChapterListResponse {
    pub total: usize,
    pub chapters: Vec<ChapterSummary>,
}

/// 把请求的序号收敛到 [0, total-1]
fn clamp_index(index: i64, total: usize) -> usize {
    let last = total.saturating_sub(1);
    if index <= 0 {
        0
    } else {
        (index as u64).min(last as u64) as usize
    }
}

async fn ensure_novel(repo: &dyn NovelRepositoryPort, novel_id: Uuid) -> Result<(), ApplicationError> {
    repo.find_by_id(novel_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApplicationError::not_found("Novel", novel_id))
}

/// GetChapter Handler
pub struct GetChapterHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl GetChapterHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, query: GetChapter) -> Result<ChapterResponse, ApplicationError> {
        ensure_novel(self.novel_repo.as_ref(), query.novel_id).await?;

        let total = self.novel_repo.count_chapters(query.novel_id).await?;
        if total == 0 {
            return Err(ApplicationError::not_found("Chapter", query.novel_id));
        }

        let index = clamp_index(query.index, total);
        let chapter = self
            .novel_repo
            .find_chapter(query.novel_id, index)
            .await?
            .ok_or_else(|| {
                ApplicationError::internal(format!(
                    "chapter {} missing for novel {} (total {})",
                    index, query.novel_id, total
                ))
            })?;

        Ok(ChapterResponse {
            index,
            total,
            title: chapter.title,
            content: chapter.content,
        })
    }
}

/// ListChapters Handler
pub struct ListChaptersHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl ListChaptersHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, query: ListChapters) -> Result<ChapterListResponse, ApplicationError> {
        ensure_novel(self.novel_repo.as_ref(), query.novel_id).await?;

        let chapters = self.novel_repo.list_chapter_titles(query.novel_id).await?;
        Ok(ChapterListResponse {
            total: chapters.len(),
            chapters,
        })
    }
}
