//! Novel Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NovelError {
    #[error("无效的标题: {0}")]
    InvalidTitle(String),

    #[error("空文件")]
    EmptyManuscript,
}
