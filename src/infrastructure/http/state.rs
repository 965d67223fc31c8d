//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    AutoSegmentHandler, ConfirmTocHandler, DeleteNovelHandler, ImportNovelHandler,
    ProposeTocHandler,
    // Query handlers
    GetChapterHandler, GetNovelHandler, GetTocSessionHandler, ListChaptersHandler,
    ListNovelsHandler, PreviewManuscriptHandler,
    // Ports
    ManuscriptStoragePort, NovelRepositoryPort, TocSessionStorePort,
};
use crate::domain::segmentation::SegmentationConfig;

/// 应用状态
///
/// 目录确认会话为内存实现，重启后丢失
pub struct AppState {
    // ========== Ports ==========
    pub novel_repo: Arc<dyn NovelRepositoryPort>,
    pub storage: Arc<dyn ManuscriptStoragePort>,
    pub toc_sessions: Arc<dyn TocSessionStorePort>,

    // ========== Command Handlers ==========
    pub import_novel_handler: ImportNovelHandler,
    pub delete_novel_handler: DeleteNovelHandler,
    pub auto_segment_handler: AutoSegmentHandler,
    pub propose_toc_handler: ProposeTocHandler,
    pub confirm_toc_handler: ConfirmTocHandler,

    // ========== Query Handlers ==========
    pub get_novel_handler: GetNovelHandler,
    pub list_novels_handler: ListNovelsHandler,
    pub preview_manuscript_handler: PreviewManuscriptHandler,
    pub get_toc_session_handler: GetTocSessionHandler,
    pub get_chapter_handler: GetChapterHandler,
    pub list_chapters_handler: ListChaptersHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        storage: Arc<dyn ManuscriptStoragePort>,
        toc_sessions: Arc<dyn TocSessionStorePort>,
        segmentation: SegmentationConfig,
        preview_lines: usize,
    ) -> Self {
        Self {
            // Ports
            novel_repo: novel_repo.clone(),
            storage: storage.clone(),
            toc_sessions: toc_sessions.clone(),

            // Command handlers
            import_novel_handler: ImportNovelHandler::new(novel_repo.clone(), storage.clone()),
            delete_novel_handler: DeleteNovelHandler::new(
                novel_repo.clone(),
                storage.clone(),
                toc_sessions.clone(),
            ),
            auto_segment_handler: AutoSegmentHandler::new(
                novel_repo.clone(),
                storage.clone(),
                segmentation.clone(),
            ),
            propose_toc_handler: ProposeTocHandler::new(
                novel_repo.clone(),
                storage.clone(),
                toc_sessions.clone(),
            ),
            confirm_toc_handler: ConfirmTocHandler::new(
                novel_repo.clone(),
                storage.clone(),
                toc_sessions.clone(),
                segmentation,
            ),

            // Query handlers
            get_novel_handler: GetNovelHandler::new(novel_repo.clone()),
            list_novels_handler: ListNovelsHandler::new(novel_repo.clone()),
            preview_manuscript_handler: PreviewManuscriptHandler::new(
                novel_repo.clone(),
                storage.clone(),
                preview_lines,
            ),
            get_toc_session_handler: GetTocSessionHandler::new(toc_sessions.clone()),
            get_chapter_handler: GetChapterHandler::new(novel_repo.clone()),
            list_chapters_handler: ListChaptersHandler::new(novel_repo),
        }
    }
}
