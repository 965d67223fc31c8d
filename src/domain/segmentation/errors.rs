//! Segmentation - Errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentationError {
    /// 手动条目解析后为空
    #[error("章节条目为空：请至少输入 1 行章节条目")]
    EmptyChapterEntries,

    /// 有目录条目在正文中找不到；整次分章作废
    #[error("目录匹配失败，{} 条目录条目未在正文中找到", missing.len())]
    UnmatchedTocEntries { missing: Vec<String> },

    #[error("无效的目录行范围: {start}-{end}（共 {total_lines} 行）")]
    InvalidTocRange {
        start: usize,
        end: usize,
        total_lines: usize,
    },
}
