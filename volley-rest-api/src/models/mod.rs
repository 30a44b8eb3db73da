pub mod common;
pub mod files;
pub mod runs;

// Re-export commonly used types
pub use common::*;
pub use files::*;
pub use runs::*;
