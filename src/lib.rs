//! Chapterize - 中日文小说分章服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Manuscript: 原稿解码与换行规范化
//! - Novel Context: 小说与章节
//! - Segmentation Context: 目录提取、标题匹配、通用标题检测、切章与超长拆分
//! - TocSession: 目录确认会话状态机
//!
//! 应用层 (application/):
//! - Ports: 端口定义（NovelRepository, ManuscriptStorage, TocSessionStore）
//! - Commands: 导入、删除、自动分章、目录提案与确认
//! - Queries: 小说、预览、目录会话、章节
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: POST-JSON 风格 API
//! - Memory: 目录会话内存存储
//! - Persistence: SQLite 存储
//! - Adapters: 原稿文件存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
