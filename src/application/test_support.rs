//! 应用层测试夹具：内存 SQLite + 临时目录 + 内存会话

use std::sync::Arc;
use tempfile::TempDir;

use crate::application::commands::handlers::{ImportNovelHandler, ImportNovelResponse};
use crate::application::commands::ImportNovel;
use crate::application::ports::{ManuscriptStoragePort, NovelRepositoryPort, TocSessionStorePort};
use crate::infrastructure::adapters::FileManuscriptStorage;
use crate::infrastructure::memory::InMemoryTocSessionStore;
use crate::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteNovelRepository,
};

pub(crate) struct Fixture {
    pub novel_repo: Arc<dyn NovelRepositoryPort>,
    pub storage: Arc<dyn ManuscriptStoragePort>,
    pub toc_sessions: Arc<dyn TocSessionStorePort>,
    _dir: TempDir,
}

impl Fixture {
    pub async fn new() -> Self {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        let storage = FileManuscriptStorage::new(dir.path(), 1024 * 1024).await.unwrap();

        Self {
            novel_repo: Arc::new(SqliteNovelRepository::new(pool)),
            storage: Arc::new(storage),
            toc_sessions: Arc::new(InMemoryTocSessionStore::new()),
            _dir: dir,
        }
    }

    pub async fn import(&self, text: &str) -> ImportNovelResponse {
        ImportNovelHandler::new(self.novel_repo.clone(), self.storage.clone())
            .handle(ImportNovel {
                title: None,
                file_name: Some("book.txt".to_string()),
                bytes: text.as_bytes().to_vec(),
            })
            .await
            .unwrap()
    }
}
