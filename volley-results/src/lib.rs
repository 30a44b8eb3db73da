//! Result-file storage for Volley
//!
//! Wraps the on-disk results directory: recursive CSV listing, storing
//! uploaded files, and unpacking uploaded ZIP archives.

pub mod error;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::ResultStore;
