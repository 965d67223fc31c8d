//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod manuscript_storage;
mod repositories;
mod toc_session_store;

pub use manuscript_storage::{ManuscriptStoragePort, StorageError};
pub use repositories::{
    ChapterRecord, ChapterSummary, NovelRecord, NovelRepositoryPort, RepositoryError,
};
pub use toc_session_store::TocSessionStorePort;
