//! 原文规范化
//!
//! 识别原始字节的编码，统一转换为 UTF-8 文本，换行统一为 `\n`，
//! 并建立「行号 → 字节偏移」索引。

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, BIG5, GBK, UTF_16BE, UTF_16LE, UTF_8};
use serde::{Deserialize, Serialize};

/// 原文编码（固定候选集）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceEncoding {
    Utf8,
    Utf8Bom,
    Utf16Le,
    Utf16Be,
    Ascii,
    Gbk,
    Big5,
}

impl SourceEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceEncoding::Utf8 => "utf-8",
            SourceEncoding::Utf8Bom => "utf-8-bom",
            SourceEncoding::Utf16Le => "utf-16le",
            SourceEncoding::Utf16Be => "utf-16be",
            SourceEncoding::Ascii => "ascii",
            SourceEncoding::Gbk => "gbk",
            SourceEncoding::Big5 => "big5",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "utf-8" => Some(SourceEncoding::Utf8),
            "utf-8-bom" => Some(SourceEncoding::Utf8Bom),
            "utf-16le" => Some(SourceEncoding::Utf16Le),
            "utf-16be" => Some(SourceEncoding::Utf16Be),
            "ascii" => Some(SourceEncoding::Ascii),
            "gbk" => Some(SourceEncoding::Gbk),
            "big5" => Some(SourceEncoding::Big5),
            _ => None,
        }
    }

    fn encoding(&self) -> &'static Encoding {
        match self {
            SourceEncoding::Utf8 | SourceEncoding::Utf8Bom | SourceEncoding::Ascii => UTF_8,
            SourceEncoding::Utf16Le => UTF_16LE,
            SourceEncoding::Utf16Be => UTF_16BE,
            SourceEncoding::Gbk => GBK,
            SourceEncoding::Big5 => BIG5,
        }
    }
}

impl std::fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 原始稿件：字节 + 识别出的编码
#[derive(Debug, Clone)]
pub struct RawManuscript {
    bytes: Vec<u8>,
    encoding: SourceEncoding,
}

impl RawManuscript {
    pub fn new(bytes: Vec<u8>) -> Self {
        let encoding = detect_encoding(&bytes);
        Self { bytes, encoding }
    }

    pub fn encoding(&self) -> SourceEncoding {
        self.encoding
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// 转换为规范化文本
    ///
    /// 不可解码的字节以 U+FFFD 替换，不视为错误。
    pub fn normalize(&self) -> NormalizedText {
        let body = match self.encoding {
            SourceEncoding::Utf8Bom => &self.bytes[3..],
            SourceEncoding::Utf16Le | SourceEncoding::Utf16Be => &self.bytes[2..],
            _ => &self.bytes[..],
        };
        let (decoded, _) = self
            .encoding
            .encoding()
            .decode_without_bom_handling(body);
        NormalizedText::from_decoded(&decoded)
    }
}

/// 识别编码
///
/// 顺序：BOM → 合法 UTF-8 → 严格 GBK → 严格 Big5 → chardetng 猜测。
pub fn detect_encoding(bytes: &[u8]) -> SourceEncoding {
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return SourceEncoding::Utf8Bom;
    }
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return SourceEncoding::Utf16Le;
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return SourceEncoding::Utf16Be;
    }

    if std::str::from_utf8(bytes).is_ok() {
        if bytes.is_ascii() {
            return SourceEncoding::Ascii;
        }
        return SourceEncoding::Utf8;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let guess = detector.guess(None, false);

    let gbk_clean = GBK
        .decode_without_bom_handling_and_without_replacement(bytes)
        .is_some();
    let big5_clean = BIG5
        .decode_without_bom_handling_and_without_replacement(bytes)
        .is_some();

    match (gbk_clean, big5_clean) {
        (true, false) => SourceEncoding::Gbk,
        (false, true) => SourceEncoding::Big5,
        // 两者都能解码时交给统计结果裁决
        _ if guess == BIG5 => SourceEncoding::Big5,
        _ => SourceEncoding::Gbk,
    }
}

/// 规范化文本：UTF-8，仅 `\n` 换行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText(String);

impl NormalizedText {
    /// 从已解码字符串构建（统一换行）
    pub fn from_decoded(text: &str) -> Self {
        Self(text.replace("\r\n", "\n").replace('\r', "\n"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn line_index(&self) -> LineIndex<'_> {
        LineIndex::build(&self.0)
    }
}

/// 单行记录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub text: &'a str,
    /// 行首字节偏移
    pub offset: usize,
}

/// 行索引
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    lines: Vec<Line<'a>>,
}

impl<'a> LineIndex<'a> {
    pub fn build(text: &'a str) -> Self {
        let mut offset = 0;
        let lines = text
            .split('\n')
            .map(|line| {
                let record = Line { text: line, offset };
                offset += line.len() + 1;
                record
            })
            .collect();
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[Line<'a>] {
        &self.lines
    }

    /// 按 1-based 行号取行
    pub fn line(&self, line_number: usize) -> Option<&Line<'a>> {
        line_number
            .checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
    }

    /// 1-based 行号 → 行首字节偏移
    pub fn offset_of(&self, line_number: usize) -> Option<usize> {
        self.line(line_number).map(|l| l.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_detected() {
        let raw = RawManuscript::new("第一章 开始".as_bytes().to_vec());
        assert_eq!(raw.encoding(), SourceEncoding::Utf8);
        assert_eq!(raw.normalize().as_str(), "第一章 开始");
    }

    #[test]
    fn test_ascii_detected() {
        let raw = RawManuscript::new(b"Prologue\nhello".to_vec());
        assert_eq!(raw.encoding(), SourceEncoding::Ascii);
    }

    #[test]
    fn test_utf8_bom_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("序章".as_bytes());
        let raw = RawManuscript::new(bytes);
        assert_eq!(raw.encoding(), SourceEncoding::Utf8Bom);
        assert_eq!(raw.normalize().as_str(), "序章");
    }

    #[test]
    fn test_gbk_converted() {
        let source = "第一章 开始\r\n这是一个关于我们的国家和人民的故事，他们在这里生活了很多年。\r\n";
        let (bytes, _, _) = GBK.encode(source);
        let raw = RawManuscript::new(bytes.into_owned());
        assert_eq!(raw.encoding(), SourceEncoding::Gbk);
        assert_eq!(
            raw.normalize().as_str(),
            "第一章 开始\n这是一个关于我们的国家和人民的故事，他们在这里生活了很多年。\n"
        );
    }

    #[test]
    fn test_line_breaks_unified() {
        let text = NormalizedText::from_decoded("a\r\nb\rc\n");
        assert_eq!(text.as_str(), "a\nb\nc\n");
    }

    #[test]
    fn test_line_index_offsets() {
        let text = NormalizedText::from_decoded("第一章\n内容\n\n第二章");
        let index = text.line_index();
        assert_eq!(index.len(), 4);
        assert_eq!(index.offset_of(1), Some(0));
        assert_eq!(index.offset_of(2), Some("第一章\n".len()));
        assert_eq!(index.line(4).map(|l| l.text), Some("第二章"));
        assert_eq!(index.offset_of(0), None);
        assert_eq!(index.offset_of(5), None);
    }

    #[test]
    fn test_encoding_round_trip_names() {
        for enc in [SourceEncoding::Utf8, SourceEncoding::Gbk, SourceEncoding::Big5] {
            assert_eq!(SourceEncoding::from_str(enc.as_str()), Some(enc));
        }
    }
}
