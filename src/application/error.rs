//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::{RepositoryError, StorageError};
use crate::domain::novel::NovelError;
use crate::domain::segmentation::SegmentationError;
use crate::domain::toc_session::InvalidTransition;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: Uuid,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 状态无效
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// 原稿文件缺失
    #[error("Manuscript file missing for novel: {0}")]
    MissingSourceFile(Uuid),

    /// 手动条目为空
    #[error("章节条目为空：请至少输入 1 行章节条目")]
    EmptyChapterEntries,

    /// 目录条目未在正文中找到（结构化报告）
    #[error("{} TOC entries not found in body", missing.len())]
    UnmatchedTocEntries { missing: Vec<String> },

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: Uuid) -> Self {
        Self::NotFound { resource_type, id }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建状态无效错误
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        Self::RepositoryError(err.to_string())
    }
}

impl From<StorageError> for ApplicationError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::TooLarge { .. } => Self::ValidationError(err.to_string()),
            _ => Self::StorageError(err.to_string()),
        }
    }
}

impl From<SegmentationError> for ApplicationError {
    fn from(err: SegmentationError) -> Self {
        match err {
            SegmentationError::EmptyChapterEntries => Self::EmptyChapterEntries,
            SegmentationError::UnmatchedTocEntries { missing } => {
                Self::UnmatchedTocEntries { missing }
            }
            SegmentationError::InvalidTocRange { .. } => Self::ValidationError(err.to_string()),
        }
    }
}

impl From<NovelError> for ApplicationError {
    fn from(err: NovelError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<InvalidTransition> for ApplicationError {
    fn from(err: InvalidTransition) -> Self {
        Self::InvalidState(err.to_string())
    }
}
