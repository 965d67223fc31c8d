//! 文本工具：空白规范化、计数、行分类

use once_cell::sync::Lazy;
use regex::Regex;

/// 行内空白（半角空格、制表符、全角空格）
#[inline]
pub fn is_inline_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\u{3000}')
}

/// 裁掉首尾的半角/全角空白，内部连续空白压成一个半角空格
pub fn normalize_spaces(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_space = false;
    for ch in s.trim_matches(is_inline_space).chars() {
        if is_inline_space(ch) {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }
    out
}

/// 去空白后的字符数（预算按此计算）
pub fn count_non_whitespace(s: &str) -> usize {
    s.chars().filter(|c| !c.is_whitespace()).count()
}

pub fn is_blank_line(line: &str) -> bool {
    line.chars().all(is_inline_space)
}

static SEPARATOR_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\-＝=－ー—―_~～·・•\*＊\.．…‥]+$").expect("separator pattern")
});

/// 纯分隔线（----、……、～～ 之类）
pub fn is_separator_line(line: &str) -> bool {
    let t = line.trim();
    !t.is_empty() && SEPARATOR_LINE.is_match(t)
}

/// 「目录」标签行
pub fn is_toc_header_line(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| !is_inline_space(*c)).collect();
    let compact = compact.trim();
    let lower = compact.to_lowercase();
    matches!(compact, "目次" | "目录" | "目錄") || lower == "contents" || lower == "tableofcontents"
}
