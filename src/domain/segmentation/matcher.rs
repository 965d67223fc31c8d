//! 按目录逐条定位正文标题
//!
//! 每条目录依次尝试 strict → relaxed → sequence_only 三级匹配，只在游标之后查找，
//! 保证标题位置严格递增。任何一条找不到，整次匹配失败。

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::SegmentationError;
use super::rules::{TocEntry, TocEntryKind};
use super::text::normalize_spaces;

const SPACE: &str = r"[ \t\x{3000}]";

/// 宽松级别下序号与标题之间可出现的标点，与各类型的识别规则一致
fn separator_class(kind: TocEntryKind) -> &'static str {
    match kind {
        TocEntryKind::ArabicNumeral => r"[.．、:：)\]・\-–—―]",
        _ => r"[、.．:：・\-–—―]",
    }
}

/// 宽松分隔符：空白，或标点前后跟可选空白
fn relaxed_separator(kind: TocEntryKind) -> String {
    format!("(?:{SPACE}+|{SPACE}*{}+{SPACE}*)", separator_class(kind))
}

/// 匹配严格程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// 序号 + 空白 + 完整标题
    Strict,
    /// 序号 + 任意分隔符 + 完整标题
    Relaxed,
    /// 序号 + 分隔符 + 任意非空内容
    SequenceOnly,
}

impl Strictness {
    pub const ALL: [Strictness; 3] = [
        Strictness::Strict,
        Strictness::Relaxed,
        Strictness::SequenceOnly,
    ];
}

/// 一条目录在正文中的命中
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingMatch {
    /// 标题行首字节偏移
    pub position: usize,
    /// 规范化后的标题行
    pub line_text: String,
    pub strictness: Strictness,
    pub entry: TocEntry,
}

/// 转义文本，内部空白可匹配任意长度的半角/全角空白
fn flex_quote(s: &str) -> String {
    s.split(|c: char| c.is_whitespace())
        .filter(|piece| !piece.is_empty())
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(&format!("{}+", SPACE))
}

/// 拆出末尾的计数字（話、章、部…）
fn split_counter(label: &str) -> Option<(&str, &str)> {
    let (i, _) = label.char_indices().last()?;
    Some((&label[..i], &label[i..]))
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit() || ('０'..='９').contains(&c)
}

/// 序号的正则
///
/// 规范化序号（`第1話`、`最終話`、`～1敗目～`）还原成识别规则接受的写法：
/// 各部分之间允许空白，Intermission 不区分大小写。
fn label_pattern(entry: &TocEntry, label: &str) -> String {
    let flexible = match entry.kind {
        TocEntryKind::JapaneseCounter => label
            .strip_prefix('第')
            .and_then(split_counter)
            .map(|(num, unit)| {
                format!("第{SPACE}*{}{SPACE}*{}", regex::escape(num), regex::escape(unit))
            }),
        TocEntryKind::JapaneseFinal => label
            .strip_prefix("最終")
            .map(|unit| format!("最終{SPACE}*{}", regex::escape(unit))),
        TocEntryKind::UnitCounter => split_counter(label)
            .map(|(num, unit)| format!("{}{SPACE}*{}", regex::escape(num), regex::escape(unit))),
        TocEntryKind::WaveCounter => label
            .strip_prefix('～')
            .and_then(|rest| rest.strip_suffix('～'))
            .map(|inner| {
                let split = inner.find(|c: char| !is_digit(c)).unwrap_or(inner.len());
                let (num, suffix) = inner.split_at(split);
                format!(
                    "[～~〜]{SPACE}*{}{SPACE}*{}{SPACE}*[～~〜]",
                    regex::escape(num),
                    regex::escape(suffix)
                )
            }),
        TocEntryKind::Intermission => Some(format!("(?i:{})", regex::escape(label))),
        _ => None,
    };
    flexible.unwrap_or_else(|| flex_quote(label))
}

/// 为条目构建指定级别的整行正则；该级别不适用时返回 None
fn build_pattern(entry: &TocEntry, mode: Strictness) -> Option<String> {
    if entry.kind.matches_whole_line() {
        // 整行匹配与级别无关，只在 strict 尝试一次
        if mode != Strictness::Strict {
            return None;
        }
        let line = flex_quote(&entry.canonical_raw_text);
        if line.is_empty() {
            return None;
        }
        // 特殊章节的识别规则不区分大小写
        let flags = if entry.kind == TocEntryKind::Special { "(?mi)" } else { "(?m)" };
        return Some(format!("{flags}^{SPACE}*{line}{SPACE}*$"));
    }

    let label = label_pattern(entry, entry.sequence_label.as_deref()?);
    let title = flex_quote(&entry.title_text);
    let tight = entry.kind.allows_tight_separator();
    let relaxed = relaxed_separator(entry.kind);

    match mode {
        Strictness::Strict => {
            if title.is_empty() {
                // 「第十二卷」这类无标题条目：整行只有序号
                return tight.then(|| format!("(?m)^{SPACE}*{label}{SPACE}*$"));
            }
            let sep = if tight {
                format!("{SPACE}*")
            } else {
                format!("{SPACE}+")
            };
            Some(format!("(?m)^{SPACE}*{label}{sep}{title}{SPACE}*$"))
        }
        Strictness::Relaxed => {
            if title.is_empty() {
                return None;
            }
            let sep = if tight {
                format!("(?:{SPACE}*|{relaxed})")
            } else {
                relaxed
            };
            Some(format!("(?m)^{SPACE}*{label}{sep}{title}{SPACE}*$"))
        }
        Strictness::SequenceOnly => {
            // 仍然要求后面有内容，避免把「○六月七日…」当成标题
            if tight {
                Some(format!(r"(?m)^{SPACE}*{label}{SPACE}*\S.*$"))
            } else {
                Some(format!(r"(?m)^{SPACE}*{label}{relaxed}\S.*$"))
            }
        }
    }
}

/// 从 cursor（行首偏移）开始查找单条目录的标题行
pub fn find_heading(text: &str, cursor: usize, entry: &TocEntry) -> Option<HeadingMatch> {
    let cursor = cursor.min(text.len());
    let tail = &text[cursor..];

    Strictness::ALL.iter().find_map(|&mode| {
        let pattern = build_pattern(entry, mode)?;
        let regex = Regex::new(&pattern).ok()?;
        regex.find(tail).map(|m| HeadingMatch {
            position: cursor + m.start(),
            line_text: normalize_spaces(m.as_str()),
            strictness: mode,
            entry: entry.clone(),
        })
    })
}

/// 按目录顺序逐条匹配
///
/// 全部命中时返回按位置严格递增的命中列表；否则返回全部未命中条目，
/// 调用方不得继续切章。
pub fn match_toc_entries(
    text: &str,
    body_start: usize,
    entries: &[TocEntry],
) -> Result<Vec<HeadingMatch>, SegmentationError> {
    let mut matches = Vec::with_capacity(entries.len());
    let mut missing = Vec::new();
    let mut cursor = body_start;

    for entry in entries {
        match find_heading(text, cursor, entry) {
            Some(found) => {
                tracing::debug!(
                    position = found.position,
                    strictness = ?found.strictness,
                    heading = %found.line_text,
                    "TOC entry matched"
                );
                // 下一条从命中行的下一行开始找
                let line_end = text[found.position..]
                    .find('\n')
                    .map_or(text.len(), |i| found.position + i + 1);
                cursor = line_end;
                matches.push(found);
            }
            None => missing.push(entry.canonical_raw_text.clone()),
        }
    }

    if missing.is_empty() {
        Ok(matches)
    } else {
        Err(SegmentationError::UnmatchedTocEntries { missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::segmentation::rules::classify_line;
    use crate::domain::segmentation::toc::parse_manual_entries;

    fn entry(line: &str) -> TocEntry {
        classify_line(line).unwrap()
    }

    #[test]
    fn test_strict_match_han_numeral() {
        let body = "まえがき\n一　出発\n朝だった。\n二　再会\n夜だった。";
        let entries = vec![entry("一　出発"), entry("二　再会")];
        let matches = match_toc_entries(body, 0, &entries).unwrap();

        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.strictness == Strictness::Strict));
        assert_eq!(matches[0].position, body.find("一　出発").unwrap());
        assert_eq!(matches[0].line_text, "一 出発");
        assert_eq!(matches[1].position, body.find("二　再会").unwrap());
    }

    #[test]
    fn test_relaxed_separator() {
        let body = "一・出発\n本文";
        let found = find_heading(body, 0, &entry("一 出発")).unwrap();
        assert_eq!(found.strictness, Strictness::Relaxed);
        assert_eq!(found.position, 0);
    }

    #[test]
    fn test_tight_separator_counter_is_strict() {
        let body = "前文\n第十章終わりの始まり\n本文";
        let found = find_heading(body, 0, &entry("第十章 終わりの始まり")).unwrap();
        assert_eq!(found.strictness, Strictness::Strict);
        assert_eq!(found.line_text, "第十章終わりの始まり");
    }

    #[test]
    fn test_sequence_only_when_title_differs() {
        let body = "序文\n3. A Different Title\n本文";
        let found = find_heading(body, 0, &entry("3. The Storm")).unwrap();
        assert_eq!(found.strictness, Strictness::SequenceOnly);
        assert_eq!(found.line_text, "3. A Different Title");
    }

    #[test]
    fn test_missing_separator_is_unmatched() {
        let body = "前文\n三终章\n内容";
        let err = match_toc_entries(body, 0, &[entry("三 终章")]).unwrap_err();
        assert_eq!(
            err,
            SegmentationError::UnmatchedTocEntries {
                missing: vec!["三 终章".to_string()]
            }
        );
    }

    #[test]
    fn test_special_matches_whole_line() {
        let body = "本文の中であとがきについて語る\nあとがき\n感謝。";
        let found = find_heading(body, 0, &entry("あとがき")).unwrap();
        assert_eq!(found.position, body.find("\nあとがき").unwrap() + 1);
    }

    #[test]
    fn test_manual_raw_exact_line() {
        let entries = parse_manual_entries("とある  一日");
        let body = "とある一日の話\n\u{3000}とある　一日\n内容";
        let found = find_heading(body, 0, &entries[0]).unwrap();
        assert_eq!(found.line_text, "とある 一日");
    }

    #[test]
    fn test_bare_counter_without_title() {
        let body = "前文\n第十二卷\n内容";
        let found = find_heading(body, 0, &entry("第十二卷")).unwrap();
        assert_eq!(found.strictness, Strictness::Strict);
    }

    #[test]
    fn test_wave_counter_accepts_either_tilde() {
        let body = "前文\n~1敗目~ 負けヒロイン\n内容";
        let found = find_heading(body, 0, &entry("～１敗目～　負けヒロイン"));
        // 全角数字与半角数字不等价
        assert!(found.is_none());
        let found = find_heading(body, 0, &entry("～1敗目～　負けヒロイン")).unwrap();
        assert_eq!(found.strictness, Strictness::Strict);
    }

    #[test]
    fn test_arabic_bracket_separators() {
        let body = "序文\n1) The Storm\n本文\n2] Night\n本文";
        let entries = vec![entry("1) The Storm"), entry("2] Night")];
        let matches = match_toc_entries(body, 0, &entries).unwrap();

        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.strictness == Strictness::Relaxed));
        assert_eq!(matches[1].line_text, "2] Night");

        let found = find_heading("前文\n4) Another\n", 0, &entry("4) The Storm")).unwrap();
        assert_eq!(found.strictness, Strictness::SequenceOnly);
    }

    #[test]
    fn test_counter_labels_allow_inner_spaces() {
        for line in ["第 1 話 出会い", "最終 話 さよなら", "〜 2nd 〜 second"] {
            let body = format!("前文\n{line}\n本文");
            let found = find_heading(&body, 0, &entry(line)).unwrap();
            assert_eq!(found.strictness, Strictness::Strict, "{line}");
            assert_eq!(found.position, "前文\n".len());
        }

        // 目录写法与正文写法的空白不同也能命中
        let found = find_heading("前文\n第 10 話出会い\n", 0, &entry("第10話 出会い")).unwrap();
        assert_eq!(found.strictness, Strictness::Strict);
    }

    #[test]
    fn test_intermission_ignores_case() {
        let body = "前文\nintermission: tea\n本文\nINTERMISSION 幕間\n本文";
        let entries = vec![entry("intermission: tea"), entry("INTERMISSION 幕間")];
        let matches = match_toc_entries(body, 0, &entries).unwrap();

        assert_eq!(matches[0].strictness, Strictness::Relaxed);
        assert_eq!(matches[1].strictness, Strictness::Strict);
        assert_eq!(matches[1].line_text, "INTERMISSION 幕間");
    }

    #[test]
    fn test_special_ignores_case() {
        let found = find_heading("本文\nPROLOGUE\n", 0, &entry("Prologue")).unwrap();
        assert_eq!(found.line_text, "PROLOGUE");
    }

    #[test]
    fn test_positions_strictly_increase() {
        // 同名标题出现两次：第二条只能命中后一处
        let body = "一 旅\n内容\n一 旅\n内容";
        let entries = parse_manual_entries("一 旅\n一　旅");
        assert_eq!(entries.len(), 1);

        let two = vec![entry("一 旅"), entry("二 帰り")];
        let err = match_toc_entries(body, 0, &two).unwrap_err();
        assert!(matches!(err, SegmentationError::UnmatchedTocEntries { ref missing } if missing == &vec!["二 帰り".to_string()]));

        let first = find_heading(body, 0, &entry("一 旅")).unwrap();
        let second = find_heading(body, first.position + 1 + "一 旅".len(), &entry("一 旅")).unwrap();
        assert!(second.position > first.position);
    }

    #[test]
    fn test_cursor_respects_body_start() {
        let body = "一 出発\n二 再会\n一 出発\n本文\n二 再会\n本文";
        let body_start = body.find("一 出発\n本文").unwrap();
        let entries = vec![entry("一 出発"), entry("二 再会")];
        let matches = match_toc_entries(body, body_start, &entries).unwrap();
        assert_eq!(matches[0].position, body_start);
        assert!(matches[1].position > matches[0].position);
    }
}
