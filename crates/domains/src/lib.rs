//! reclaim/crates/domains/src/lib.rs
//!
//! Domain models, the claim state machine, error taxonomy, and the port
//! traits adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use errors::*;
pub use models::*;
pub use ports::*;
