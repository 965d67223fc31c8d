//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod novel_commands;
mod segmentation_commands;

pub mod handlers;

pub use novel_commands::*;
pub use segmentation_commands::*;
