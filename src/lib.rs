//! # Apexboard - Formula 1 dashboard proxy
//!
//! Apexboard sits between a browser dashboard and the public Ergast
//! motorsport API, re-shaping upstream JSON into the exact structures the
//! dashboard's charts and widgets consume.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Ergast API │────▶│  upstream   │────▶│  transform  │────▶│  dashboard  │
//! │   (MRData)  │     │  (typed)    │     │ (pure fns)  │     │   widgets   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! The two transforms carry all the real logic and are pure functions:
//! the comparison series builder (lower-is-better inversion) and the
//! race-event timeline reconstructor (pit stops + lap timings merged into
//! one ordered sequence). Everything around them is fetch-and-relay.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use apexboard::server::start_server;
//!
//! #[tokio::main]
//! async fn main() {
//!     start_server(3000).await.unwrap();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Upstream and server error types
//! - [`config`] - Environment configuration
//! - [`models`] - Domain models (RaceEvent, DriverStatValue, ...)
//! - [`upstream`] - Typed Ergast API client
//! - [`transform`] - Comparison and timeline transforms
//! - [`coalesce`] - Selection generation guard + debounce
//! - [`api`] - HTTP API server
//! - [`logging`] - fern logger setup

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Upstream client
pub mod upstream;

// Transforms
pub mod transform;

// Selection coalescing
pub mod coalesce;

// HTTP API
pub mod api;

// Logging
pub mod logging;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{ServerError, ServerResult, UpstreamError, UpstreamResult};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    driver_lookup, ComparisonSeriesPoint, DriverRef, DriverStatValue, LapRecord, LapTiming,
    PitStopRecord, RaceData, RaceEvent, Statistic,
};

// =============================================================================
// Re-exports - Transforms
// =============================================================================

pub use transform::{build_comparison, reconstruct, ComparisonRaw, ComparisonSeries};

// =============================================================================
// Re-exports - Upstream
// =============================================================================

pub use upstream::{parse_lap_time, ErgastClient};

// =============================================================================
// Re-exports - Coalescing
// =============================================================================

pub use coalesce::{debounced, debounced_default, Generation, SelectionGuard};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{
    error_response, ordinal_suffix, ComparisonRequest, CountdownResponse, RacesCompletedResponse,
    StatusResponse, StatusSection, TeamStandingsResponse, TimelineResponse,
};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
