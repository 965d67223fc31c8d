//! Novel Query Handlers

use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::manuscript::load_normalized;
use crate::application::ports::{
    ManuscriptStoragePort, NovelRecord, NovelRepositoryPort, TocSessionStorePort,
};
use crate::application::queries::{GetNovel, GetTocSession, ListNovels, PreviewManuscript};
use crate::domain::segmentation::preview;
use crate::domain::toc_session::TocSessionState;

// ============================================================================
// Response DTOs
// ============================================================================

/// 小说详情响应
#[derive(Debug, Clone)]
pub struct NovelResponse {
    pub id: Uuid,
    pub title: String,
    pub status: String,
    pub encoding: String,
    pub digest: String,
    pub size_bytes: u64,
    pub total_chapters: usize,
    pub created_at: String,
    pub updated_at: String,
}

impl From<NovelRecord> for NovelResponse {
    fn from(record: NovelRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            status: record.status.as_str().to_string(),
            encoding: record.encoding.as_str().to_string(),
            digest: record.digest,
            size_bytes: record.size_bytes,
            total_chapters: record.total_chapters,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

/// 原稿预览响应
#[derive(Debug, Clone)]
pub struct PreviewResponse {
    pub novel_id: Uuid,
    pub total_lines: usize,
    pub lines: Vec<String>,
}

/// 目录会话响应
#[derive(Debug, Clone)]
pub struct TocSessionResponse {
    pub novel_id: Uuid,
    pub start_line: usize,
    pub end_line: usize,
    pub proposal: Vec<String>,
    pub state: TocSessionState,
    pub updated_at: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GetNovel Handler
pub struct GetNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl GetNovelHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, query: GetNovel) -> Result<NovelResponse, ApplicationError> {
        let novel = self
            .novel_repo
            .find_by_id(query.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", query.novel_id))?;

        Ok(NovelResponse::from(novel))
    }
}

/// ListNovels Handler
pub struct ListNovelsHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl ListNovelsHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, _query: ListNovels) -> Result<Vec<NovelResponse>, ApplicationError> {
        let novels = self.novel_repo.find_all().await?;
        Ok(novels.into_iter().map(NovelResponse::from).collect())
    }
}

/// PreviewManuscript Handler
pub struct PreviewManuscriptHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    storage: Arc<dyn ManuscriptStoragePort>,
    default_lines: usize,
}

impl PreviewManuscriptHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        storage: Arc<dyn ManuscriptStoragePort>,
        default_lines: usize,
    ) -> Self {
        Self {
            novel_repo,
            storage,
            default_lines,
        }
    }

    pub async fn handle(&self, query: PreviewManuscript) -> Result<PreviewResponse, ApplicationError> {
        let novel = self
            .novel_repo
            .find_by_id(query.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", query.novel_id))?;

        let lines = query.lines.unwrap_or(self.default_lines);
        if lines == 0 {
            return Err(ApplicationError::validation("lines must be greater than 0"));
        }

        let text = load_normalized(self.storage.as_ref(), novel.id).await?;
        let preview = preview(&text, lines);

        Ok(PreviewResponse {
            novel_id: novel.id,
            total_lines: preview.total_lines,
            lines: preview.lines,
        })
    }
}

/// GetTocSession Handler
pub struct GetTocSessionHandler {
    toc_sessions: Arc<dyn TocSessionStorePort>,
}

impl GetTocSessionHandler {
    pub fn new(toc_sessions: Arc<dyn TocSessionStorePort>) -> Self {
        Self { toc_sessions }
    }

    pub async fn handle(&self, query: GetTocSession) -> Result<TocSessionResponse, ApplicationError> {
        let session = self
            .toc_sessions
            .get(query.novel_id)
            .ok_or_else(|| ApplicationError::not_found("TocSession", query.novel_id))?;

        Ok(TocSessionResponse {
            novel_id: query.novel_id,
            start_line: session.start_line(),
            end_line: session.end_line(),
            proposal: session.proposal().to_vec(),
            state: session.state().clone(),
            updated_at: session.updated_at().to_rfc3339(),
        })
    }
}
