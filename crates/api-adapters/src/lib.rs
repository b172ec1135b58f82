//! # api-adapters
//!
//! The request layer for Reclaim: HTTP routing, request/response shapes,
//! error-to-status mapping, and metrics. Business rules stay in `services`.

pub mod errors;
pub mod metrics;

#[cfg(feature = "web-axum")]
pub mod http;

pub use errors::{error_kind, status_code};
pub use metrics::Metrics;
