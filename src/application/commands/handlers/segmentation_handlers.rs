//! Segmentation Command Handlers
//!
//! 分章本身是同步纯函数，直接在请求内执行；只有全部成功时才替换章节表。

use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{AutoSegment, ConfirmToc, ProposeToc};
use crate::application::error::ApplicationError;
use crate::application::manuscript::load_normalized;
use crate::application::ports::{
    ChapterRecord, ChapterSummary, ManuscriptStoragePort, NovelRecord, NovelRepositoryPort,
    TocSessionStorePort,
};
use crate::domain::novel::{Chapter, NovelId};
use crate::domain::segmentation::{
    propose_toc, segment_auto, segment_with_toc, SegmentationConfig, SegmentationError,
};
use crate::domain::toc_session::{TocSession, TocSessionState};

/// 分章结果
#[derive(Debug, Clone)]
pub struct SegmentResponse {
    pub novel_id: Uuid,
    pub total: usize,
    pub chapters: Vec<ChapterSummary>,
}

async fn find_novel(
    repo: &dyn NovelRepositoryPort,
    novel_id: Uuid,
) -> Result<NovelRecord, ApplicationError> {
    repo.find_by_id(novel_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Novel", novel_id))
}

/// 持久化章节列表，返回目录
async fn persist_chapters(
    repo: &dyn NovelRepositoryPort,
    novel_id: Uuid,
    chapters: &[Chapter],
) -> Result<SegmentResponse, ApplicationError> {
    let records = ChapterRecord::from_chapters(novel_id, chapters);
    repo.replace_chapters(novel_id, &records).await?;

    Ok(SegmentResponse {
        novel_id,
        total: records.len(),
        chapters: records
            .into_iter()
            .map(|r| ChapterSummary {
                index: r.index,
                title: r.title,
            })
            .collect(),
    })
}

// ============================================================================
// AutoSegment
// ============================================================================

/// AutoSegment Handler - 通用标题检测分章
pub struct AutoSegmentHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    storage: Arc<dyn ManuscriptStoragePort>,
    config: SegmentationConfig,
}

impl AutoSegmentHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        storage: Arc<dyn ManuscriptStoragePort>,
        config: SegmentationConfig,
    ) -> Self {
        Self {
            novel_repo,
            storage,
            config,
        }
    }

    pub async fn handle(&self, command: AutoSegment) -> Result<SegmentResponse, ApplicationError> {
        let novel = find_novel(self.novel_repo.as_ref(), command.novel_id).await?;
        let text = load_normalized(self.storage.as_ref(), novel.id).await?;

        let chapters = segment_auto(&text, &self.config);
        let response = persist_chapters(self.novel_repo.as_ref(), novel.id, &chapters).await?;

        tracing::info!(
            novel_id = %novel.id,
            title = %novel.title,
            chapters = response.total,
            mode = "auto",
            "Novel segmented"
        );

        Ok(response)
    }
}

// ============================================================================
// ProposeToc
// ============================================================================

/// 目录提案响应
#[derive(Debug, Clone)]
pub struct TocProposalResponse {
    pub novel_id: Uuid,
    pub start_line: usize,
    pub end_line: usize,
    pub total_lines: usize,
    /// 规则表识别出的条目数（为 0 时 entries 是目录区原始行）
    pub recognized: usize,
    pub entries: Vec<String>,
}

/// ProposeToc Handler - 从目录行范围提取条目，开启新的确认会话
pub struct ProposeTocHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    storage: Arc<dyn ManuscriptStoragePort>,
    toc_sessions: Arc<dyn TocSessionStorePort>,
}

impl ProposeTocHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        storage: Arc<dyn ManuscriptStoragePort>,
        toc_sessions: Arc<dyn TocSessionStorePort>,
    ) -> Self {
        Self {
            novel_repo,
            storage,
            toc_sessions,
        }
    }

    pub async fn handle(&self, command: ProposeToc) -> Result<TocProposalResponse, ApplicationError> {
        let novel = find_novel(self.novel_repo.as_ref(), command.novel_id).await?;
        let text = load_normalized(self.storage.as_ref(), novel.id).await?;

        let proposal = propose_toc(&text, command.start_line, command.end_line)?;

        self.toc_sessions.put(TocSession::propose(
            NovelId::from_uuid(novel.id),
            proposal.start_line,
            proposal.end_line,
            proposal.lines.clone(),
        ));

        tracing::info!(
            novel_id = %novel.id,
            start_line = proposal.start_line,
            end_line = proposal.end_line,
            recognized = proposal.entries.len(),
            "TOC proposed"
        );

        Ok(TocProposalResponse {
            novel_id: novel.id,
            start_line: proposal.start_line,
            end_line: proposal.end_line,
            total_lines: proposal.total_lines,
            recognized: proposal.entries.len(),
            entries: proposal.lines,
        })
    }
}

// ============================================================================
// ConfirmToc
// ============================================================================

/// ConfirmToc Handler - 按操作者确认的条目分章
///
/// 任何条目未匹配时章节表保持不变，会话进入 Failed 并报告全部未匹配条目。
pub struct ConfirmTocHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    storage: Arc<dyn ManuscriptStoragePort>,
    toc_sessions: Arc<dyn TocSessionStorePort>,
    config: SegmentationConfig,
}

impl ConfirmTocHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        storage: Arc<dyn ManuscriptStoragePort>,
        toc_sessions: Arc<dyn TocSessionStorePort>,
        config: SegmentationConfig,
    ) -> Self {
        Self {
            novel_repo,
            storage,
            toc_sessions,
            config,
        }
    }

    pub async fn handle(&self, command: ConfirmToc) -> Result<SegmentResponse, ApplicationError> {
        let novel = find_novel(self.novel_repo.as_ref(), command.novel_id).await?;
        let mut session = self.toc_sessions.get(novel.id).ok_or_else(|| {
            ApplicationError::invalid_state("TOC range not proposed yet for this novel")
        })?;
        let text = load_normalized(self.storage.as_ref(), novel.id).await?;

        // 上次失败：操作者重新提交即回到 Proposed
        if matches!(session.state(), TocSessionState::Failed { .. }) {
            session.reopen()?;
        }
        session.confirm(command.entries.as_str())?;

        let result = segment_with_toc(&text, session.end_line(), &command.entries, &self.config);
        let chapters = match result {
            Ok(chapters) => chapters,
            Err(SegmentationError::UnmatchedTocEntries { missing }) => {
                tracing::warn!(
                    novel_id = %novel.id,
                    missing = missing.len(),
                    entries = ?missing,
                    "TOC entries not found in body"
                );
                session.mark_failed(missing.clone())?;
                self.toc_sessions.put(session);
                return Err(ApplicationError::UnmatchedTocEntries { missing });
            }
            Err(e) => {
                session.abandon()?;
                self.toc_sessions.put(session);
                return Err(e.into());
            }
        };

        let response = match persist_chapters(self.novel_repo.as_ref(), novel.id, &chapters).await {
            Ok(response) => response,
            Err(e) => {
                session.abandon()?;
                self.toc_sessions.put(session);
                return Err(e);
            }
        };

        session.mark_matched(response.total)?;
        self.toc_sessions.put(session);

        tracing::info!(
            novel_id = %novel.id,
            title = %novel.title,
            chapters = response.total,
            mode = "toc",
            "Novel segmented"
        );

        Ok(response)
    }
}
