//! Novel Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{NovelError, NovelId, NovelStatus, Title};
use crate::domain::manuscript::{RawManuscript, SourceEncoding};

/// Novel 聚合根
///
/// 不变量:
/// - 原稿字节上传后不再修改，digest 与之对应
/// - status 为 Ready 当且仅当 total_chapters > 0
/// - 章节列表整体替换，不做局部修改
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Novel {
    id: NovelId,
    title: Title,
    status: NovelStatus,
    encoding: SourceEncoding,
    /// 原稿字节的 md5
    digest: String,
    size_bytes: u64,
    total_chapters: usize,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Novel {
    /// 从上传的原稿创建
    pub fn import(title: Title, manuscript: &RawManuscript) -> Result<Self, NovelError> {
        if manuscript.bytes().is_empty() {
            return Err(NovelError::EmptyManuscript);
        }
        let now = Utc::now();
        Ok(Self {
            id: NovelId::new(),
            title,
            status: NovelStatus::Pending,
            encoding: manuscript.encoding(),
            digest: format!("{:x}", md5::compute(manuscript.bytes())),
            size_bytes: manuscript.bytes().len() as u64,
            total_chapters: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// 从持久化数据重建
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: NovelId,
        title: Title,
        status: NovelStatus,
        encoding: SourceEncoding,
        digest: String,
        size_bytes: u64,
        total_chapters: usize,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            status,
            encoding,
            digest,
            size_bytes,
            total_chapters,
            created_at,
            updated_at,
        }
    }

    /// 记录新的章节列表
    pub fn chapters_replaced(&mut self, total_chapters: usize) {
        self.total_chapters = total_chapters;
        self.status = if total_chapters > 0 {
            NovelStatus::Ready
        } else {
            NovelStatus::Pending
        };
        self.updated_at = Utc::now();
    }

    // Getters
    pub fn id(&self) -> &NovelId {
        &self.id
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn status(&self) -> NovelStatus {
        self.status
    }

    pub fn encoding(&self) -> SourceEncoding {
        self.encoding
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn total_chapters(&self) -> usize {
        self.total_chapters
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_novel_import() {
        let title = Title::new("测试小说").unwrap();
        let raw = RawManuscript::new("第一章 开始\n内容".as_bytes().to_vec());
        let novel = Novel::import(title, &raw).unwrap();

        assert_eq!(novel.title().as_str(), "测试小说");
        assert_eq!(novel.status(), NovelStatus::Pending);
        assert_eq!(novel.encoding(), SourceEncoding::Utf8);
        assert_eq!(novel.digest().len(), 32);
        assert_eq!(novel.total_chapters(), 0);
    }

    #[test]
    fn test_empty_manuscript_rejected() {
        let title = Title::new("空").unwrap();
        let raw = RawManuscript::new(Vec::new());
        assert!(matches!(
            Novel::import(title, &raw),
            Err(NovelError::EmptyManuscript)
        ));
    }

    #[test]
    fn test_chapters_replaced_updates_status() {
        let title = Title::new("测试小说").unwrap();
        let raw = RawManuscript::new(b"text".to_vec());
        let mut novel = Novel::import(title, &raw).unwrap();

        novel.chapters_replaced(3);
        assert_eq!(novel.status(), NovelStatus::Ready);
        assert_eq!(novel.total_chapters(), 3);
    }
}
