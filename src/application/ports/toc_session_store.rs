//! TOC Session Store Port - 目录确认会话
//!
//! 会话只保存在内存中，每本小说至多一个

use uuid::Uuid;

use crate::domain::toc_session::TocSession;

/// TOC Session Store Port
pub trait TocSessionStorePort: Send + Sync {
    /// 保存会话（同一本小说的旧会话被替换）
    fn put(&self, session: TocSession);

    /// 获取会话副本
    fn get(&self, novel_id: Uuid) -> Option<TocSession>;

    /// 删除会话，返回是否存在
    fn remove(&self, novel_id: Uuid) -> bool;
}
