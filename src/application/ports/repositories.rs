//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（如 SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::manuscript::SourceEncoding;
use crate::domain::novel::{Chapter, Novel, NovelStatus};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Novel Repository
// ============================================================================

/// 小说实体（用于持久化）
#[derive(Debug, Clone)]
pub struct NovelRecord {
    pub id: Uuid,
    pub title: String,
    pub status: NovelStatus,
    pub encoding: SourceEncoding,
    pub digest: String,
    pub size_bytes: u64,
    pub total_chapters: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Novel> for NovelRecord {
    fn from(novel: &Novel) -> Self {
        Self {
            id: *novel.id().as_uuid(),
            title: novel.title().as_str().to_string(),
            status: novel.status(),
            encoding: novel.encoding(),
            digest: novel.digest().to_string(),
            size_bytes: novel.size_bytes(),
            total_chapters: novel.total_chapters(),
            created_at: novel.created_at(),
            updated_at: novel.updated_at(),
        }
    }
}

/// 章节实体（用于持久化）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRecord {
    pub novel_id: Uuid,
    pub index: usize,
    pub title: String,
    pub content: String,
    pub char_count: usize,
}

impl ChapterRecord {
    /// 按列表顺序分配 index
    pub fn from_chapters(novel_id: Uuid, chapters: &[Chapter]) -> Vec<Self> {
        chapters
            .iter()
            .enumerate()
            .map(|(index, chapter)| Self {
                novel_id,
                index,
                title: chapter.title().to_string(),
                content: chapter.content().to_string(),
                char_count: chapter.char_count(),
            })
            .collect()
    }
}

/// 章节目录项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterSummary {
    pub index: usize,
    pub title: String,
}

/// Novel Repository Port
#[async_trait]
pub trait NovelRepositoryPort: Send + Sync {
    /// 保存小说
    async fn save(&self, novel: &NovelRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找小说
    async fn find_by_id(&self, id: Uuid) -> Result<Option<NovelRecord>, RepositoryError>;

    /// 获取所有小说
    async fn find_all(&self) -> Result<Vec<NovelRecord>, RepositoryError>;

    /// 删除小说及其章节
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;

    /// 整体替换章节列表，同一事务内更新 total_chapters 与 status
    async fn replace_chapters(
        &self,
        novel_id: Uuid,
        chapters: &[ChapterRecord],
    ) -> Result<(), RepositoryError>;

    /// 获取指定章节
    async fn find_chapter(
        &self,
        novel_id: Uuid,
        index: usize,
    ) -> Result<Option<ChapterRecord>, RepositoryError>;

    /// 章节目录（按 index 升序）
    async fn list_chapter_titles(&self, novel_id: Uuid) -> Result<Vec<ChapterSummary>, RepositoryError>;

    /// 章节数
    async fn count_chapters(&self, novel_id: Uuid) -> Result<usize, RepositoryError>;
}
