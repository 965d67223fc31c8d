//! 按标题位置切章

use super::matcher::HeadingMatch;
use super::text::{is_blank_line, normalize_spaces};
use crate::domain::novel::Chapter;

pub const BODY_TITLE: &str = "正文";
pub const PROLOGUE_TITLE: &str = "序章";

/// 正文中的一个标题位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 标题行首字节偏移
    pub position: usize,
    pub title: String,
}

impl From<HeadingMatch> for Heading {
    fn from(m: HeadingMatch) -> Self {
        Self {
            position: m.position,
            title: m.line_text,
        }
    }
}

/// 保证章节内容以标题行开头
fn ensure_heading(title: &str, content: &str) -> String {
    let first_line = content
        .lines()
        .map(normalize_spaces)
        .find(|l| !l.is_empty());

    match first_line {
        Some(line) if line == normalize_spaces(title) => content.to_string(),
        _ => format!("{}\n{}", title, content),
    }
}

/// 去掉开头的空行，保留首个非空行的缩进和其后的原文
fn skip_leading_blank_lines(span: &str) -> &str {
    let mut start = 0;
    for line in span.split_inclusive('\n') {
        if !is_blank_line(line.trim_end_matches('\n')) {
            break;
        }
        start += line.len();
    }
    &span[start..]
}

/// 把全文切成连续章节
///
/// 没有标题时整本书作为一章「正文」。`with_prologue` 为真且首个标题前有非空文本时，
/// 额外生成「序章」。
pub fn assemble_chapters(text: &str, headings: &[Heading], with_prologue: bool) -> Vec<Chapter> {
    let mut sorted: Vec<&Heading> = headings.iter().collect();
    sorted.sort_by_key(|h| h.position);
    sorted.dedup_by_key(|h| h.position);

    let Some(first) = sorted.first() else {
        return vec![Chapter::new(BODY_TITLE, skip_leading_blank_lines(text))];
    };

    let mut chapters = Vec::with_capacity(sorted.len() + 1);

    let lead = &text[..first.position.min(text.len())];
    if !lead.trim().is_empty() {
        if with_prologue {
            chapters.push(Chapter::new(PROLOGUE_TITLE, skip_leading_blank_lines(lead)));
        } else {
            tracing::debug!(bytes = lead.len(), "text before first heading dropped");
        }
    }

    for (i, heading) in sorted.iter().enumerate() {
        let start = heading.position.min(text.len());
        let end = sorted
            .get(i + 1)
            .map_or(text.len(), |next| next.position.min(text.len()));
        if end <= start {
            continue;
        }

        let content = ensure_heading(&heading.title, skip_leading_blank_lines(&text[start..end]));
        chapters.push(Chapter::new(heading.title.clone(), content));
    }

    chapters
}
