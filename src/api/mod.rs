//! HTTP API module for health, status, opportunity and metrics endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::{AppState, ScanQuery, ScanSummary};
pub use routes::create_router;
