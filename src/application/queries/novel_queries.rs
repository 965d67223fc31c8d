//! Novel Queries

use uuid::Uuid;

/// 获取小说详情查询
#[derive(Debug, Clone)]
pub struct GetNovel {
    pub novel_id: Uuid,
}

/// 列出所有小说查询
#[derive(Debug, Clone)]
pub struct ListNovels;

/// 原稿开头若干行（带行号），供操作者选择目录范围
#[derive(Debug, Clone)]
pub struct PreviewManuscript {
    pub novel_id: Uuid,
    pub lines: Option<usize>,
}

/// 当前目录确认会话
#[derive(Debug, Clone)]
pub struct GetTocSession {
    pub novel_id: Uuid,
}
