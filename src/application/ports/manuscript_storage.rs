//! Manuscript Storage Port - 出站端口
//!
//! 原稿按上传时的字节原样保存，每本小说一个文件

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// 原稿存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File too large: {size} bytes, limit {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("IO error: {0}")]
    IoError(String),
}

/// Manuscript Storage Port
#[async_trait]
pub trait ManuscriptStoragePort: Send + Sync {
    /// 原稿文件路径
    fn manuscript_path(&self, novel_id: Uuid) -> PathBuf;

    /// 保存原稿字节
    async fn save(&self, novel_id: Uuid, bytes: &[u8]) -> Result<PathBuf, StorageError>;

    /// 读取原稿字节
    async fn read(&self, novel_id: Uuid) -> Result<Vec<u8>, StorageError>;

    /// 删除原稿（不存在时忽略）
    async fn delete(&self, novel_id: Uuid) -> Result<(), StorageError>;

    /// 原稿是否存在
    async fn exists(&self, novel_id: Uuid) -> bool;
}
