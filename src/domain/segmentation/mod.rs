//! Segmentation Context - 分章引擎
//!
//! 纯同步、无副作用的分章算法：
//! - 自动模式：通用标题检测 → 切章 → 超长拆分
//! - 目录模式：提取目录 → 操作者编辑 → 逐条匹配 → 切章（总是生成序章）→ 超长拆分
//!
//! 目录模式是全有或全无：任何一条目录匹配不到，都不产生章节列表。

mod assembler;
mod detector;
mod errors;
mod matcher;
mod rules;
mod splitter;
mod text;
mod toc;

pub use assembler::{assemble_chapters, Heading, BODY_TITLE, PROLOGUE_TITLE};
pub use detector::detect_headings;
pub use errors::SegmentationError;
pub use matcher::{find_heading, match_toc_entries, HeadingMatch, Strictness};
pub use rules::{classify_line, TocEntry, TocEntryKind};
pub use splitter::{split_content, split_oversized_chapters};
pub use text::{count_non_whitespace, normalize_spaces};
pub use toc::{extract_toc_entries, fallback_proposal_lines, parse_manual_entries};

use serde::{Deserialize, Serialize};

use crate::domain::manuscript::NormalizedText;
use crate::domain::novel::Chapter;

/// 分章参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// 单章非空白字符上限
    pub max_chars_per_chapter: usize,
    /// 相邻标题最小字节距离（仅自动模式）
    pub min_heading_gap: usize,
    /// 标题行最大字符数（仅自动模式）
    pub max_heading_chars: usize,
    /// 自动模式下首个标题前的文本是否生成序章
    pub auto_prologue: bool,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            max_chars_per_chapter: 5000,
            min_heading_gap: 5,
            max_heading_chars: 140,
            auto_prologue: true,
        }
    }
}

// ============================================================================
// 自动模式
// ============================================================================

/// 自动分章
pub fn segment_auto(text: &NormalizedText, config: &SegmentationConfig) -> Vec<Chapter> {
    let index = text.line_index();
    let headings = detect_headings(&index, config);
    tracing::debug!(headings = headings.len(), "generic headings detected");

    let chapters = assemble_chapters(text.as_str(), &headings, config.auto_prologue);
    split_oversized_chapters(chapters, config.max_chars_per_chapter)
}

// ============================================================================
// 目录模式
// ============================================================================

/// 目录提案
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocProposal {
    pub start_line: usize,
    pub end_line: usize,
    pub total_lines: usize,
    /// 识别出的条目（可能为空）
    pub entries: Vec<TocEntry>,
    /// 交给操作者编辑的行：条目原文；没有识别出条目时为目录区的原始行
    pub lines: Vec<String>,
}

impl TocProposal {
    /// 每行一条的可编辑文本
    pub fn editable_text(&self) -> String {
        self.lines.join("\n")
    }
}

fn check_range(
    total_lines: usize,
    start_line: usize,
    end_line: usize,
) -> Result<(), SegmentationError> {
    if start_line == 0 || start_line > end_line || end_line > total_lines {
        return Err(SegmentationError::InvalidTocRange {
            start: start_line,
            end: end_line,
            total_lines,
        });
    }
    Ok(())
}

/// 从目录行范围（1-based，含首尾）生成提案
pub fn propose_toc(
    text: &NormalizedText,
    start_line: usize,
    end_line: usize,
) -> Result<TocProposal, SegmentationError> {
    let index = text.line_index();
    check_range(index.len(), start_line, end_line)?;

    let entries = extract_toc_entries(&index, start_line, end_line);
    let lines = if entries.is_empty() {
        fallback_proposal_lines(&index, start_line, end_line)
    } else {
        entries.iter().map(|e| e.canonical_raw_text.clone()).collect()
    };

    Ok(TocProposal {
        start_line,
        end_line,
        total_lines: index.len(),
        entries,
        lines,
    })
}

/// 正文起始偏移：目录区最后一行的下一行
pub fn body_start_after(text: &NormalizedText, end_line: usize) -> usize {
    text.line_index()
        .offset_of(end_line + 1)
        .unwrap_or_else(|| text.len())
}

/// 用操作者确认的条目文本分章
///
/// 条目文本每行一条；正文从目录区后一行开始。目录前后的文本都归入序章。
pub fn segment_with_toc(
    text: &NormalizedText,
    end_line: usize,
    entries_text: &str,
    config: &SegmentationConfig,
) -> Result<Vec<Chapter>, SegmentationError> {
    let total_lines = text.line_index().len();
    check_range(total_lines, end_line.max(1), end_line)?;

    let entries = parse_manual_entries(entries_text);
    if entries.is_empty() {
        return Err(SegmentationError::EmptyChapterEntries);
    }

    let body_start = body_start_after(text, end_line);
    let matches = match_toc_entries(text.as_str(), body_start, &entries)?;
    let headings: Vec<Heading> = matches.into_iter().map(Heading::from).collect();

    let chapters = assemble_chapters(text.as_str(), &headings, true);
    Ok(split_oversized_chapters(chapters, config.max_chars_per_chapter))
}

// ============================================================================
// 预览
// ============================================================================

/// 带行号的开头若干行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManuscriptPreview {
    pub total_lines: usize,
    pub lines: Vec<String>,
}

pub fn preview(text: &NormalizedText, max_lines: usize) -> ManuscriptPreview {
    let index = text.line_index();
    let lines = index
        .lines()
        .iter()
        .take(max_lines)
        .enumerate()
        .map(|(i, line)| format!("{:>4} | {}", i + 1, line.text))
        .collect();

    ManuscriptPreview {
        total_lines: index.len(),
        lines,
    }
}
