//! Novel Context - Entities

use serde::{Deserialize, Serialize};

use crate::domain::segmentation::count_non_whitespace;

/// 章节 - 分章结果与阅读单位
///
/// 不变量:
/// - 顺序由所在列表决定，index 在持久化时分配
/// - content 以标题行开头（超长拆分出的后续分片除外）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// 章节标题
    title: String,
    /// 章节正文
    content: String,
}

impl Chapter {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// 非空白字符数
    pub fn char_count(&self) -> usize {
        count_non_whitespace(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_char_count() {
        let chapter = Chapter::new("第一章", "第一章\n\u{3000}内容 A");
        assert_eq!(chapter.title(), "第一章");
        assert_eq!(chapter.char_count(), 6);
    }
}
