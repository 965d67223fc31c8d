//! Chapter Queries

use uuid::Uuid;

/// 按序号获取章节（越界时收敛到 [0, total-1]）
#[derive(Debug, Clone)]
pub struct GetChapter {
    pub novel_id: Uuid,
    pub index: i64,
}

/// 章节目录查询
#[derive(Debug, Clone)]
pub struct ListChapters {
    pub novel_id: Uuid,
}
