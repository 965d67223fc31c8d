//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（NovelRepository、ManuscriptStorage、TocSessionStore）
//! - commands: CQRS 命令及处理器（导入、删除、自动分章、目录提案与确认）
//! - queries: CQRS 查询及处理器（小说、预览、目录会话、章节）
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

mod manuscript;
#[cfg(test)]
mod test_support;

// Re-exports
pub use commands::{
    AutoSegment,
    ConfirmToc,
    DeleteNovel,
    ImportNovel,
    ProposeToc,
    // Handlers
    handlers::{
        AutoSegmentHandler, ConfirmTocHandler, DeleteNovelHandler, ImportNovelHandler,
        ImportNovelResponse, ProposeTocHandler, SegmentResponse, TocProposalResponse,
    },
};

pub use error::ApplicationError;

pub use ports::{
    ChapterRecord, ChapterSummary, ManuscriptStoragePort, NovelRecord, NovelRepositoryPort,
    RepositoryError, StorageError, TocSessionStorePort,
};

pub use queries::{
    GetChapter,
    GetNovel,
    GetTocSession,
    ListChapters,
    ListNovels,
    PreviewManuscript,
    // Handlers
    handlers::{
        ChapterListResponse, ChapterResponse, GetChapterHandler, GetNovelHandler,
        GetTocSessionHandler, ListChaptersHandler, ListNovelsHandler, NovelResponse,
        PreviewManuscriptHandler, PreviewResponse, TocSessionResponse,
    },
};
