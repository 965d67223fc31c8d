//! File Storage - 文件系统原稿存储实现
//!
//! 实现 ManuscriptStoragePort trait，原稿保存为 `{base_dir}/{novel_id}.txt`

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::{ManuscriptStoragePort, StorageError};

/// 文件系统原稿存储
pub struct FileManuscriptStorage {
    /// 存储根目录
    base_dir: PathBuf,
    /// 单个原稿字节上限
    max_size: u64,
}

impl FileManuscriptStorage {
    /// 创建新的文件存储
    pub async fn new(base_dir: impl AsRef<Path>, max_size: u64) -> Result<Self, StorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        Ok(Self { base_dir, max_size })
    }

    /// 获取存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait]
impl ManuscriptStoragePort for FileManuscriptStorage {
    fn manuscript_path(&self, novel_id: Uuid) -> PathBuf {
        self.base_dir.join(format!("{}.txt", novel_id))
    }

    async fn save(&self, novel_id: Uuid, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        let size = bytes.len() as u64;
        if size > self.max_size {
            return Err(StorageError::TooLarge {
                size,
                limit: self.max_size,
            });
        }

        let path = self.manuscript_path(novel_id);
        fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        tracing::debug!(
            novel_id = %novel_id,
            path = %path.display(),
            size = size,
            "Manuscript saved"
        );

        Ok(path)
    }

    async fn read(&self, novel_id: Uuid) -> Result<Vec<u8>, StorageError> {
        let path = self.manuscript_path(novel_id);

        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound(
                path.to_string_lossy().to_string(),
            )),
            Err(e) => Err(StorageError::IoError(e.to_string())),
        }
    }

    async fn delete(&self, novel_id: Uuid) -> Result<(), StorageError> {
        let path = self.manuscript_path(novel_id);

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(novel_id = %novel_id, "Manuscript deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::IoError(e.to_string())),
        }
    }

    async fn exists(&self, novel_id: Uuid) -> bool {
        fs::try_exists(self.manuscript_path(novel_id))
            .await
            .unwrap_or(false)
    }
}
