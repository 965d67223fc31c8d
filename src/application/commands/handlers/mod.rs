//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod novel_handlers;
mod segmentation_handlers;

pub use novel_handlers::*;
pub use segmentation_handlers::*;
