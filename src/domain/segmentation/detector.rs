//! 无目录时的通用标题检测

use super::assembler::Heading;
use super::rules::{classify_line, TocEntry, TocEntryKind};
use super::text::{is_blank_line, normalize_spaces};
use super::SegmentationConfig;
use crate::domain::manuscript::{Line, LineIndex};

/// 需要至少两个字标题的类型（防止「一 是」这类叙述被当成标题）
fn requires_title(kind: TocEntryKind) -> bool {
    matches!(
        kind,
        TocEntryKind::HanNumeral
            | TocEntryKind::ArabicNumeral
            | TocEntryKind::UnitCounter
            | TocEntryKind::WaveCounter
            | TocEntryKind::Intermission
    )
}

/// 紧跟序号也能表示标题开始的字符
const TITLE_OPENERS: &[char] = &[
    '「', '『', '（', '(', '【', '〈', '《', '“', '"', ':', '：', '、', '・', '-', '—', '―',
];

/// 「第X章」单独成行，或后面是空白、括号等分隔
///
/// 「第三章で述べたように…」这类叙述不算。
fn marker_stands_apart(line: &str, entry: &TocEntry) -> bool {
    if !entry.kind.is_explicit_marker() {
        return false;
    }
    if entry.title_text.is_empty() {
        return true;
    }
    let line = normalize_spaces(line);
    match line.strip_suffix(entry.title_text.as_str()) {
        Some(marker) => marker.ends_with(' ') || entry.title_text.starts_with(TITLE_OPENERS),
        None => false,
    }
}

/// 前一行或后一行为空（文首文尾视为空行）
fn has_blank_neighbour(lines: &[Line<'_>], i: usize) -> bool {
    let before = i == 0 || is_blank_line(lines[i - 1].text);
    let after = i + 1 >= lines.len() || is_blank_line(lines[i + 1].text);
    before || after
}

/// 扫描全文，返回按位置递增的标题
///
/// 与后文分开的「第X章」直接接受；其余标题必须与空行相邻。
/// 与上一个已接受标题的距离小于 `min_heading_gap` 字节时丢弃。
pub fn detect_headings(index: &LineIndex<'_>, config: &SegmentationConfig) -> Vec<Heading> {
    let lines = index.lines();
    let mut headings: Vec<Heading> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let Some(entry) = classify_line(line.text) else {
            continue;
        };
        if line.text.trim().chars().count() > config.max_heading_chars {
            continue;
        }
        if requires_title(entry.kind) && entry.title_text.chars().count() < 2 {
            continue;
        }
        if !marker_stands_apart(line.text, &entry) && !has_blank_neighbour(lines, i) {
            continue;
        }
        if let Some(last) = headings.last() {
            if line.offset - last.position < config.min_heading_gap {
                continue;
            }
        }

        headings.push(Heading {
            position: line.offset,
            title: normalize_spaces(line.text),
        });
    }

    headings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::manuscript::NormalizedText;

    fn detect(text: &str) -> Vec<Heading> {
        let text = NormalizedText::from_decoded(text);
        detect_headings(&text.line_index(), &SegmentationConfig::default())
    }

    #[test]
    fn test_explicit_markers_without_blank_lines() {
        let headings = detect("第一章 开始\n内容A\n第二章 继续\n内容B");
        let titles: Vec<&str> = headings.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, vec!["第一章 开始", "第二章 继续"]);
        assert_eq!(headings[0].position, 0);
    }

    #[test]
    fn test_marker_inside_sentence_needs_blank_neighbour() {
        let text = "彼は言った。\n第三章で述べたように、話は続く。\n次の行。";
        assert!(detect(text).is_empty());

        let headings = detect("前文。\n\n第十章終わりの始まり\n本文。");
        assert_eq!(headings.len(), 1);

        let headings = detect("前文。\n第1話「出会い」\n本文。\n第十二卷\n本文。");
        let titles: Vec<&str> = headings.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, vec!["第1話「出会い」", "第十二卷"]);
    }

    #[test]
    fn test_numeral_heading_needs_blank_neighbour() {
        let narrative = detect("朝になった。\n一 度だけ振り返った\n彼は歩き出した。");
        assert!(narrative.is_empty());

        let headings = detect("朝になった。\n\n一　出発\n彼は歩き出した。");
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].title, "一 出発");
    }

    #[test]
    fn test_short_title_rejected() {
        assert!(detect("前文\n\n1. A\n\n本文").is_empty());
        assert_eq!(detect("前文\n\n1. AB\n\n本文").len(), 1);
    }

    #[test]
    fn test_overlong_line_rejected() {
        let long = format!("第一章 {}", "长".repeat(200));
        assert!(detect(&format!("\n{}\n", long)).is_empty());
    }

    #[test]
    fn test_min_gap() {
        let config = SegmentationConfig {
            min_heading_gap: 64,
            ..SegmentationConfig::default()
        };
        let text = NormalizedText::from_decoded("第一章 甲\n第二章 乙\n内容");
        let headings = detect_headings(&text.line_index(), &config);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].title, "第一章 甲");
    }
}
