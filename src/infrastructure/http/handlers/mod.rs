//! HTTP Handlers

mod chapter;
mod novel;
mod ping;
mod segment;

pub use chapter::*;
pub use novel::*;
pub use ping::*;
pub use segment::*;
