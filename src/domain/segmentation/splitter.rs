//! 超长章节拆分
//!
//! 预算按非空白字符计。先按段落（空行分隔）贪心合并，单段超预算时按行合并，
//! 单行仍超预算时按固定字符数硬切。

use once_cell::sync::Lazy;
use regex::Regex;

use super::text::count_non_whitespace;
use crate::domain::novel::Chapter;

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{2,}").expect("paragraph break pattern"));

/// 累积中的分片
#[derive(Default)]
struct PartBuffer {
    text: String,
    chars: usize,
}

impl PartBuffer {
    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn append(&mut self, piece: &str, chars: usize, joiner: &str) {
        if !self.text.is_empty() {
            self.text.push_str(joiner);
        }
        self.text.push_str(piece);
        self.chars += chars;
    }

    fn take(&mut self) -> String {
        self.chars = 0;
        std::mem::take(&mut self.text)
    }
}

/// 按固定字符数硬切
fn hard_slice(line: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    chars
        .chunks(max_chars.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// 单个超预算段落按行拆分
fn split_paragraph(paragraph: &str, max_chars: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut buffer = PartBuffer::default();

    for line in paragraph.split('\n') {
        let chars = count_non_whitespace(line);
        if chars > max_chars {
            if !buffer.is_empty() {
                pieces.push(buffer.take());
            }
            pieces.extend(hard_slice(line, max_chars));
            continue;
        }
        if !buffer.is_empty() && buffer.chars + chars > max_chars {
            pieces.push(buffer.take());
        }
        buffer.append(line, chars, "\n");
    }

    if !buffer.is_empty() {
        pieces.push(buffer.take());
    }
    pieces
}

/// 把章节内容拆成不超过预算的若干段
pub fn split_content(content: &str, max_chars: usize) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = PartBuffer::default();

    let paragraphs = PARAGRAPH_BREAK
        .split(content)
        .map(|p| p.trim_end_matches('\n'))
        .filter(|p| !p.trim().is_empty());

    for paragraph in paragraphs {
        let chars = count_non_whitespace(paragraph);

        if chars > max_chars {
            for piece in split_paragraph(paragraph, max_chars) {
                if !current.is_empty() {
                    parts.push(current.take());
                }
                let piece_chars = count_non_whitespace(&piece);
                current.append(&piece, piece_chars, "");
            }
            continue;
        }

        if !current.is_empty() && current.chars + chars > max_chars {
            parts.push(current.take());
        }
        current.append(paragraph, chars, "\n\n");
    }

    if !current.is_empty() {
        parts.push(current.take());
    }
    parts
}

/// 拆分超预算的章节，分片标题加「（n）」后缀，顺序不变
pub fn split_oversized_chapters(chapters: Vec<Chapter>, max_chars: usize) -> Vec<Chapter> {
    let mut result = Vec::with_capacity(chapters.len());

    for chapter in chapters {
        if count_non_whitespace(chapter.content()) <= max_chars {
            result.push(chapter);
            continue;
        }

        let parts = split_content(chapter.content(), max_chars);
        if parts.len() <= 1 {
            result.push(chapter);
            continue;
        }

        tracing::debug!(title = %chapter.title(), parts = parts.len(), "oversized chapter split");
        result.extend(
            parts
                .into_iter()
                .enumerate()
                .map(|(i, part)| Chapter::new(format!("{}（{}）", chapter.title(), i + 1), part)),
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_chapter_untouched() {
        let chapters = vec![Chapter::new("第一章", "短い\n\n本文")];
        let result = split_oversized_chapters(chapters.clone(), 5000);
        assert_eq!(result, chapters);
    }

    #[test]
    fn test_paragraph_split_twelve_thousand() {
        let paragraph = "字".repeat(1000);
        let content = vec![paragraph.as_str(); 12].join("\n\n");
        let result = split_oversized_chapters(vec![Chapter::new("第一章 开始", content)], 5000);

        let titles: Vec<&str> = result.iter().map(|c| c.title()).collect();
        assert_eq!(titles, vec!["第一章 开始（1）", "第一章 开始（2）", "第一章 开始（3）"]);
        assert!(result
            .iter()
            .all(|c| count_non_whitespace(c.content()) <= 5000));
        let total: usize = result.iter().map(|c| count_non_whitespace(c.content())).sum();
        assert_eq!(total, 12000);
    }

    #[test]
    fn test_large_paragraph_split_by_line() {
        let line = "行".repeat(40);
        let paragraph = vec![line.as_str(); 5].join("\n");
        let parts = split_content(&paragraph, 100);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], format!("{}\n{}", line, line));
        assert!(parts.iter().all(|p| count_non_whitespace(p) <= 100));
    }

    #[test]
    fn test_single_line_hard_sliced() {
        let parts = split_content(&"长".repeat(250), 100);
        let sizes: Vec<usize> = parts.iter().map(|p| p.chars().count()).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
    }

    #[test]
    fn test_budget_counts_non_whitespace_only() {
        let content = format!("{}\n\n{}", "a b ".repeat(30), "c d ".repeat(30));
        let parts = split_content(&content, 120);
        assert_eq!(parts.len(), 1);
    }
}
