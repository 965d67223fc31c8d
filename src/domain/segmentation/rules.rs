//! 标题规则表
//!
//! 按优先级排列的 (正则, 提取器) 列表，第一条命中的规则生效，后续规则不再尝试。
//! 目录解析和通用标题检测共用同一张表。

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use super::text::{is_separator_line, is_toc_header_line, normalize_spaces};

/// 目录条目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TocEntryKind {
    /// 序章、后记、番外等特殊章节（无序号）
    Special,
    /// 第N話 / 第N章（阿拉伯数字）
    JapaneseCounter,
    /// 最終話
    JapaneseFinal,
    /// 第X章 / 第X卷（汉字或阿拉伯数字）
    ChineseCounter,
    /// 一　标题
    HanNumeral,
    /// 1. 标题
    ArabicNumeral,
    /// 一章　标题 / 3話 标题（不带「第」）
    UnitCounter,
    /// ～1敗目～ 标题
    WaveCounter,
    /// Intermission 标题
    Intermission,
    /// 手动输入且无法解析的整行标题
    ManualRaw,
}

impl TocEntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TocEntryKind::Special => "special",
            TocEntryKind::JapaneseCounter => "japanese_counter",
            TocEntryKind::JapaneseFinal => "japanese_final",
            TocEntryKind::ChineseCounter => "chinese_counter",
            TocEntryKind::HanNumeral => "han_numeral",
            TocEntryKind::ArabicNumeral => "arabic_numeral",
            TocEntryKind::UnitCounter => "unit_counter",
            TocEntryKind::WaveCounter => "wave_counter",
            TocEntryKind::Intermission => "intermission",
            TocEntryKind::ManualRaw => "manual_raw",
        }
    }

    /// 序号与标题之间允许零空白（第十章标题、一章「标题」、～1敗目～标题）
    pub fn allows_tight_separator(&self) -> bool {
        matches!(
            self,
            TocEntryKind::JapaneseCounter
                | TocEntryKind::JapaneseFinal
                | TocEntryKind::ChineseCounter
                | TocEntryKind::UnitCounter
                | TocEntryKind::WaveCounter
        )
    }

    /// 按整行精确匹配，而不是「序号 + 标题」
    pub fn matches_whole_line(&self) -> bool {
        matches!(self, TocEntryKind::Special | TocEntryKind::ManualRaw)
    }

    /// 「第X章」这类带明确章节标记的类型
    pub fn is_explicit_marker(&self) -> bool {
        matches!(
            self,
            TocEntryKind::JapaneseCounter
                | TocEntryKind::JapaneseFinal
                | TocEntryKind::ChineseCounter
        )
    }
}

/// 目录条目
///
/// 同一次提取内按 (kind, sequence_label, title_text, canonical_raw_text) 去重。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TocEntry {
    pub kind: TocEntryKind,
    pub sequence_label: Option<String>,
    pub title_text: String,
    pub canonical_raw_text: String,
}

impl TocEntry {
    /// 手动输入中无法识别的行，原样保留
    pub fn manual_raw(line: &str) -> Self {
        let raw = normalize_spaces(line);
        Self {
            kind: TocEntryKind::ManualRaw,
            sequence_label: None,
            title_text: String::new(),
            canonical_raw_text: raw,
        }
    }

    fn special(line: &str) -> Self {
        let raw = normalize_spaces(line);
        Self {
            kind: TocEntryKind::Special,
            sequence_label: None,
            title_text: raw.clone(),
            canonical_raw_text: raw,
        }
    }

    /// 「第一章 标题」形式：标题可以为空
    fn counter(kind: TocEntryKind, label: String, title: &str) -> Self {
        let title = normalize_spaces(title);
        let full = if title.is_empty() {
            label.clone()
        } else {
            format!("{} {}", label, title)
        };
        Self {
            kind,
            canonical_raw_text: normalize_spaces(&full),
            sequence_label: Some(label),
            title_text: title,
        }
    }

    /// 「一 标题」形式：规则已保证标题非空
    fn separated(kind: TocEntryKind, label: String, title: &str) -> Self {
        let title = normalize_spaces(title);
        Self {
            kind,
            canonical_raw_text: normalize_spaces(&format!("{} {}", label, title)),
            sequence_label: Some(label),
            title_text: title,
        }
    }
}

fn group<'t>(caps: &Captures<'t>, i: usize) -> &'t str {
    caps.get(i).map_or("", |m| m.as_str())
}

struct HeadingRule {
    kind: TocEntryKind,
    pattern: &'static str,
    extract: fn(&str, &Captures) -> TocEntry,
}

/// 规则表（顺序即优先级）
const HEADING_RULES: &[HeadingRule] = &[
    // 不能用 \b：对中日文词不生效
    HeadingRule {
        kind: TocEntryKind::Special,
        pattern: r"(?i)^[ \t\x{3000}]*(プロローグ|エピローグ|序章|終章|前書き|あとがき|後書き|後記|后记|番外|外伝|外传|附录|附錄|Prologue|Epilogue|Afterword|Preface)",
        extract: |line, _| TocEntry::special(line),
    },
    HeadingRule {
        kind: TocEntryKind::JapaneseCounter,
        pattern: r"^[ \t\x{3000}]*第\s*([0-9０-９]+)\s*(話|章|節|回|部)\s*(.*)$",
        extract: |_, caps| {
            let label = format!("第{}{}", normalize_spaces(group(caps, 1)), group(caps, 2));
            TocEntry::counter(TocEntryKind::JapaneseCounter, label, group(caps, 3))
        },
    },
    HeadingRule {
        kind: TocEntryKind::JapaneseFinal,
        pattern: r"^[ \t\x{3000}]*最終\s*(話|章|節|回|部)\s*(.*)$",
        extract: |_, caps| {
            let label = format!("最終{}", group(caps, 1));
            TocEntry::counter(TocEntryKind::JapaneseFinal, label, group(caps, 2))
        },
    },
    HeadingRule {
        kind: TocEntryKind::ChineseCounter,
        pattern: r"^[ \t\x{3000}]*第([一二三四五六七八九十百千万零〇两0-9０-９]+)([章节卷回部幕集话])\s*(.*)$",
        extract: |_, caps| {
            let label = format!("第{}{}", group(caps, 1), group(caps, 2));
            TocEntry::counter(TocEntryKind::ChineseCounter, label, group(caps, 3))
        },
    },
    // 序号后必须有分隔符，避免把「○六月七日…」这种项目符号当成章节
    HeadingRule {
        kind: TocEntryKind::HanNumeral,
        pattern: r"^[ \t\x{3000}]*([〇○零一二三四五六七八九十百千万]{1,6})(?:[ \t\x{3000}]+|[、.．:：・\-–—―]+[ \t\x{3000}]*)(\S.*)$",
        extract: |_, caps| {
            TocEntry::separated(TocEntryKind::HanNumeral, group(caps, 1).to_string(), group(caps, 2))
        },
    },
    HeadingRule {
        kind: TocEntryKind::ArabicNumeral,
        pattern: r"^[ \t\x{3000}]*([0-9０-９]{1,4})(?:[ \t\x{3000}]+|[.．、:：)\]][ \t\x{3000}]*)(\S.*)$",
        extract: |_, caps| {
            TocEntry::separated(TocEntryKind::ArabicNumeral, group(caps, 1).to_string(), group(caps, 2))
        },
    },
    HeadingRule {
        kind: TocEntryKind::UnitCounter,
        pattern: r"^[ \t\x{3000}]*([〇○零一二三四五六七八九十百千万]{1,6}|[0-9０-９]{1,4})\s*(章|話|節|回|部|幕)\s*(\S.*)$",
        extract: |_, caps| {
            let label = format!("{}{}", normalize_spaces(group(caps, 1)), group(caps, 2));
            TocEntry::counter(TocEntryKind::UnitCounter, label, group(caps, 3))
        },
    },
    HeadingRule {
        kind: TocEntryKind::WaveCounter,
        pattern: r"^[ \t\x{3000}]*[～~〜]\s*([0-9０-９]+)\s*(敗目|日目|st|nd|rd|th)?\s*[～~〜]\s*(\S.*)$",
        extract: |_, caps| {
            let label = format!("～{}{}～", normalize_spaces(group(caps, 1)), group(caps, 2));
            TocEntry::separated(TocEntryKind::WaveCounter, label, group(caps, 3))
        },
    },
    HeadingRule {
        kind: TocEntryKind::Intermission,
        pattern: r"(?i)^[ \t\x{3000}]*(Intermission)\s*(?:[ \t\x{3000}]+|[、.．:：・\-–—―]+[ \t\x{3000}]*)(\S.*)$",
        extract: |_, caps| {
            TocEntry::separated(TocEntryKind::Intermission, "Intermission".to_string(), group(caps, 2))
        },
    },
];

struct CompiledRule {
    kind: TocEntryKind,
    regex: Regex,
    extract: fn(&str, &Captures) -> TocEntry,
}

static COMPILED_RULES: Lazy<Vec<CompiledRule>> = Lazy::new(|| {
    HEADING_RULES
        .iter()
        .map(|rule| CompiledRule {
            kind: rule.kind,
            regex: Regex::new(rule.pattern).expect("heading rule pattern"),
            extract: rule.extract,
        })
        .collect()
});

/// 对单行应用规则表
///
/// 空行、分隔线、「目录」标签行直接跳过；其余行第一条命中的规则生效。
pub fn classify_line(line: &str) -> Option<TocEntry> {
    let raw = line.trim();
    if raw.is_empty() || is_separator_line(raw) || is_toc_header_line(raw) {
        return None;
    }

    COMPILED_RULES.iter().find_map(|rule| {
        rule.regex.captures(raw).map(|caps| {
            let entry = (rule.extract)(raw, &caps);
            debug_assert_eq!(entry.kind, rule.kind);
            entry
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(line: &str) -> Option<TocEntryKind> {
        classify_line(line).map(|e| e.kind)
    }

    #[test]
    fn test_special_keywords() {
        let entry = classify_line("\u{3000}あとがき").unwrap();
        assert_eq!(entry.kind, TocEntryKind::Special);
        assert_eq!(entry.sequence_label, None);
        assert_eq!(entry.canonical_raw_text, "あとがき");
        assert_eq!(kind_of("PROLOGUE"), Some(TocEntryKind::Special));
        assert_eq!(kind_of("番外 夏祭り"), Some(TocEntryKind::Special));
    }

    #[test]
    fn test_japanese_counter() {
        let entry = classify_line("第１話「出会い」").unwrap();
        assert_eq!(entry.kind, TocEntryKind::JapaneseCounter);
        assert_eq!(entry.sequence_label.as_deref(), Some("第１話"));
        assert_eq!(entry.title_text, "「出会い」");
        assert_eq!(entry.canonical_raw_text, "第１話 「出会い」");
    }

    #[test]
    fn test_japanese_final() {
        let entry = classify_line("最終話　さよなら").unwrap();
        assert_eq!(entry.kind, TocEntryKind::JapaneseFinal);
        assert_eq!(entry.sequence_label.as_deref(), Some("最終話"));
        assert_eq!(entry.title_text, "さよなら");
    }

    #[test]
    fn test_chinese_counter() {
        let entry = classify_line("第一章 开始").unwrap();
        assert_eq!(entry.kind, TocEntryKind::ChineseCounter);
        assert_eq!(entry.sequence_label.as_deref(), Some("第一章"));
        assert_eq!(entry.title_text, "开始");

        let bare = classify_line("第十二卷").unwrap();
        assert_eq!(bare.kind, TocEntryKind::ChineseCounter);
        assert_eq!(bare.title_text, "");
        assert_eq!(bare.canonical_raw_text, "第十二卷");
    }

    #[test]
    fn test_han_numeral_requires_separator() {
        let entry = classify_line("一\u{3000}出発").unwrap();
        assert_eq!(entry.kind, TocEntryKind::HanNumeral);
        assert_eq!(entry.canonical_raw_text, "一 出発");
        assert_eq!(kind_of("三、终章"), Some(TocEntryKind::HanNumeral));
        // 项目符号式的日记条目不能当成章节
        assert_eq!(kind_of("○六月七日 晴れ"), None);
        assert_eq!(kind_of("三终章"), None);
    }

    #[test]
    fn test_arabic_numeral() {
        let entry = classify_line("12. The Storm").unwrap();
        assert_eq!(entry.kind, TocEntryKind::ArabicNumeral);
        assert_eq!(entry.sequence_label.as_deref(), Some("12"));
        assert_eq!(entry.title_text, "The Storm");
        assert_eq!(kind_of("2024年の夏"), None);
    }

    #[test]
    fn test_unit_counter() {
        let entry = classify_line("一章　旅立ち").unwrap();
        assert_eq!(entry.kind, TocEntryKind::UnitCounter);
        assert_eq!(entry.sequence_label.as_deref(), Some("一章"));
        assert_eq!(entry.title_text, "旅立ち");
        assert_eq!(kind_of("3話「再会」"), Some(TocEntryKind::UnitCounter));
        // 只有单位词没有标题
        assert_eq!(kind_of("一章"), None);
    }

    #[test]
    fn test_wave_counter() {
        let entry = classify_line("～１敗目～　負けヒロイン").unwrap();
        assert_eq!(entry.kind, TocEntryKind::WaveCounter);
        assert_eq!(entry.sequence_label.as_deref(), Some("～１敗目～"));
        assert_eq!(entry.title_text, "負けヒロイン");
        assert_eq!(kind_of("〜2nd〜 second"), Some(TocEntryKind::WaveCounter));
    }

    #[test]
    fn test_intermission() {
        let entry = classify_line("Intermission　幕間の話").unwrap();
        assert_eq!(entry.kind, TocEntryKind::Intermission);
        assert_eq!(entry.canonical_raw_text, "Intermission 幕間の話");
        assert_eq!(kind_of("intermission: tea"), Some(TocEntryKind::Intermission));
    }

    #[test]
    fn test_skipped_lines() {
        assert_eq!(kind_of(""), None);
        assert_eq!(kind_of("――――"), None);
        assert_eq!(kind_of("目次"), None);
        assert_eq!(kind_of("普通の文章です。"), None);
    }

    #[test]
    fn test_rule_order_wins() {
        // 「第1章」同时满足日文与中文规则，日文规则在前
        assert_eq!(kind_of("第1章 はじまり"), Some(TocEntryKind::JapaneseCounter));
        // 「序章」同时是特殊关键字
        assert_eq!(kind_of("序章 夜明け"), Some(TocEntryKind::Special));
    }

    #[test]
    fn test_manual_raw() {
        let entry = TocEntry::manual_raw("  とある  一日 ");
        assert_eq!(entry.kind, TocEntryKind::ManualRaw);
        assert_eq!(entry.canonical_raw_text, "とある 一日");
    }
}
