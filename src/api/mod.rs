//! HTTP API module.
//!
//! The axum server and the widget-facing request/response types.

pub mod server;
pub mod types;

pub use server::start_server;
pub use types::*;
