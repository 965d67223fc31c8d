//! Memory Layer - In-Memory State Management
//!
//! 目录确认会话的内存状态

mod toc_session_store;

pub use toc_session_store::InMemoryTocSessionStore;
