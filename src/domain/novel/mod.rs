//! Novel Context - 小说限界上下文
//!
//! 职责:
//! - 小说聚合管理（原稿元数据、分章状态）
//! - 章节实体

mod aggregate;
mod entities;
mod errors;
mod value_objects;

pub use aggregate::Novel;
pub use entities::Chapter;
pub use errors::NovelError;
pub use value_objects::{NovelId, NovelStatus, Title};
