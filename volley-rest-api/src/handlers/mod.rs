pub mod files;
pub mod health;
pub mod runs;

// Re-export handler functions
pub use files::*;
pub use health::*;
pub use runs::*;
