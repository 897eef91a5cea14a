//! Error types for the apexboard proxy.
//!
//! Two layers:
//!
//! - [`UpstreamError`] - failures talking to (or decoding) the Ergast API
//! - [`ServerError`] - HTTP-layer errors wrapping upstream failures
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries. The pure transforms in
//! [`crate::transform`] never return errors: missing data degrades to
//! nulls or excluded events per the dashboard's fail-soft policy.

use thiserror::Error;

// =============================================================================
// Upstream (Ergast) Errors
// =============================================================================

/// Errors when fetching or decoding Ergast API data.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The HTTP request itself failed (connection, timeout, ...).
    #[error("Upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("Upstream returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The response body did not match the expected MRData envelope.
    #[error("Failed to decode upstream response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The envelope decoded but the expected table/list was absent.
    #[error("Upstream data missing: {0}")]
    MissingData(String),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Upstream fetch or decode failure.
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Invalid request from the dashboard.
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for upstream fetches.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Result type for server handlers.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // UpstreamError -> ServerError
        let upstream_err = UpstreamError::MissingData("StandingsLists".into());
        let server_err: ServerError = upstream_err.into();
        assert!(server_err.to_string().contains("StandingsLists"));

        // serde_json::Error -> UpstreamError
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let upstream_err: UpstreamError = json_err.into();
        assert!(upstream_err.to_string().contains("decode"));
    }

    #[test]
    fn test_status_error_format() {
        let err = UpstreamError::Status {
            status: 503,
            url: "https://ergast.com/api/f1/seasons.json".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("seasons.json"));
    }
}
