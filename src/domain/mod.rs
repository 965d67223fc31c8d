//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Novel Context: 小说与章节管理
//! - Segmentation Context: 分章引擎（原文规范化、目录匹配、标题检测、切章）

pub mod manuscript;
pub mod novel;
pub mod segmentation;
pub mod toc_session;
