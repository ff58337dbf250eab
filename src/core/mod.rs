pub mod debug_logger;
pub mod probe;

pub use debug_logger::{get_debug_logger, DebugLogger};
