//! Volley server assembly
//!
//! Wires configuration, the run supervisor, the results store, and the
//! HTTP layer into a runnable service.

pub mod logging;
pub mod startup;

pub use startup::Server;
