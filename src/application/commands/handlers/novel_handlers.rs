//! Novel Command Handlers

use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{DeleteNovel, ImportNovel};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ManuscriptStoragePort, NovelRecord, NovelRepositoryPort, TocSessionStorePort,
};
use crate::domain::manuscript::{RawManuscript, SourceEncoding};
use crate::domain::novel::{Novel, NovelStatus, Title};

const UNTITLED: &str = "Untitled";

/// 标题优先级：显式标题 → 文件名（去扩展名）→ Untitled
fn resolve_title(title: Option<&str>, file_name: Option<&str>) -> String {
    let explicit = title.map(str::trim).filter(|t| !t.is_empty());
    let from_file = file_name
        .and_then(|name| Path::new(name).file_stem())
        .and_then(|stem| stem.to_str())
        .map(str::trim)
        .filter(|t| !t.is_empty());

    explicit.or(from_file).unwrap_or(UNTITLED).to_string()
}

// ============================================================================
// ImportNovel
// ============================================================================

/// 导入小说响应
#[derive(Debug, Clone)]
pub struct ImportNovelResponse {
    pub id: Uuid,
    pub title: String,
    pub status: NovelStatus,
    pub encoding: SourceEncoding,
    pub total_lines: usize,
}

/// ImportNovel Handler - 保存原稿字节并创建 pending 状态的记录
pub struct ImportNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    storage: Arc<dyn ManuscriptStoragePort>,
}

impl ImportNovelHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        storage: Arc<dyn ManuscriptStoragePort>,
    ) -> Self {
        Self {
            novel_repo,
            storage,
        }
    }

    pub async fn handle(&self, command: ImportNovel) -> Result<ImportNovelResponse, ApplicationError> {
        let title = resolve_title(command.title.as_deref(), command.file_name.as_deref());
        let title = Title::new(title).map_err(ApplicationError::validation)?;

        let manuscript = RawManuscript::new(command.bytes);
        let novel = Novel::import(title, &manuscript)?;
        let record = NovelRecord::from(&novel);
        let total_lines = manuscript.normalize().line_index().len();

        self.storage.save(record.id, manuscript.bytes()).await?;

        if let Err(e) = self.novel_repo.save(&record).await {
            // 记录写入失败时不留下孤立的原稿文件
            if let Err(cleanup) = self.storage.delete(record.id).await {
                tracing::warn!(novel_id = %record.id, error = %cleanup, "Failed to remove orphan manuscript");
            }
            return Err(e.into());
        }

        tracing::info!(
            novel_id = %record.id,
            title = %record.title,
            encoding = %record.encoding,
            size = record.size_bytes,
            "Novel imported"
        );

        Ok(ImportNovelResponse {
            id: record.id,
            title: record.title,
            status: record.status,
            encoding: record.encoding,
            total_lines,
        })
    }
}

// ============================================================================
// DeleteNovel
// ============================================================================

/// DeleteNovel Handler - 删除记录、章节、原稿与目录会话
pub struct DeleteNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    storage: Arc<dyn ManuscriptStoragePort>,
    toc_sessions: Arc<dyn TocSessionStorePort>,
}

impl DeleteNovelHandler {
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

    pub async fn handle(&self, command: DeleteNovel) -> Result<(), ApplicationError> {
        let novel_id = command.novel_id;

        // 检查小说是否存在
        let novel = self
            .novel_repo
            .find_by_id(novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", novel_id))?;

        self.novel_repo.delete(novel_id).await?;
        self.storage.delete(novel_id).await?;
        self.toc_sessions.remove(novel_id);

        tracing::info!(
            novel_id = %novel_id,
            title = %novel.title,
            "Novel deleted"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::Fixture;

    #[test]
    fn test_resolve_title() {
        assert_eq!(resolve_title(Some(" 负けヒロイン "), Some("a.txt")), "负けヒロイン");
        assert_eq!(resolve_title(Some("  "), Some("dir/小说.txt")), "小说");
        assert_eq!(resolve_title(None, None), UNTITLED);
        assert_eq!(resolve_title(None, Some(".txt")), ".txt");
    }

    #[tokio::test]
    async fn test_import_and_delete() {
        let fx = Fixture::new().await;
        let imported = fx
            .import("第一章 开始\n内容A\n第二章 继续\n内容B")
            .await;
        assert_eq!(imported.status, NovelStatus::Pending);
        assert_eq!(imported.encoding, SourceEncoding::Utf8);
        assert_eq!(imported.total_lines, 4);
        assert!(fx.storage.exists(imported.id).await);

        let handler = DeleteNovelHandler::new(
            fx.novel_repo.clone(),
            fx.storage.clone(),
            fx.toc_sessions.clone(),
        );
        handler
            .handle(DeleteNovel { novel_id: imported.id })
            .await
            .unwrap();

        assert!(fx.novel_repo.find_by_id(imported.id).await.unwrap().is_none());
        assert!(!fx.storage.exists(imported.id).await);

        let again = handler.handle(DeleteNovel { novel_id: imported.id }).await;
        assert!(matches!(again, Err(ApplicationError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_import_rejects_empty_file() {
        let fx = Fixture::new().await;
        let handler = ImportNovelHandler::new(fx.novel_repo.clone(), fx.storage.clone());
        let result = handler
            .handle(ImportNovel {
                title: Some("空".to_string()),
                file_name: None,
                bytes: Vec::new(),
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::ValidationError(_))));
    }
}
