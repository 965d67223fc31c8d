//! 目录条目解析
//!
//! 两个入口：
//! - 自动：扫描操作者指定的目录行范围，规则表识别不了的行丢弃
//! - 手动：操作者编辑后的条目文本（每行一条），识别不了的行按整行标题保留

use std::collections::HashSet;

use super::rules::{classify_line, TocEntry};
use super::text::{is_separator_line, is_toc_header_line, normalize_spaces};
use crate::domain::manuscript::LineIndex;

/// 去重（保持首次出现的顺序）
fn dedup_entries(entries: impl IntoIterator<Item = TocEntry>) -> Vec<TocEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert(e.clone()))
        .collect()
}

/// 从目录区（1-based，含首尾）提取条目
pub fn extract_toc_entries(index: &LineIndex<'_>, start_line: usize, end_line: usize) -> Vec<TocEntry> {
    let lines = (start_line..=end_line).filter_map(|n| index.line(n));
    dedup_entries(lines.filter_map(|line| classify_line(line.text)))
}

/// 解析手动编辑的条目文本
pub fn parse_manual_entries(text: &str) -> Vec<TocEntry> {
    let entries = text.lines().filter_map(|line| {
        let line = normalize_spaces(line.trim_end_matches('\r'));
        if line.is_empty() {
            return None;
        }
        Some(classify_line(&line).unwrap_or_else(|| TocEntry::manual_raw(&line)))
    });
    dedup_entries(entries)
}

/// 目录区内可供操作者编辑的原始行（自动提取为空时的兜底）
pub fn fallback_proposal_lines(index: &LineIndex<'_>, start_line: usize, end_line: usize) -> Vec<String> {
    (start_line..=end_line)
        .filter_map(|n| index.line(n))
        .map(|line| line.text.trim())
        .filter(|t| !t.is_empty() && !is_toc_header_line(t) && !is_separator_line(t))
        .map(str::to_string)
        .collect()
}
