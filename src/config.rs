//! Environment-driven configuration.
//!
//! All knobs come from the environment (a `.env` file is honored):
//!
//! | Variable              | Default                          |
//! |-----------------------|----------------------------------|
//! | `ERGAST_API_BASE_URL` | `https://ergast.com/api/f1/`     |
//! | `PORT`                | `3000`                           |
//! | `FOCUS_CONSTRUCTOR`   | `aston_martin`                   |
//! | `UPSTREAM_TIMEOUT_MS` | `10000`                          |
//! | `DEBOUNCE_MS`         | `300`                            |

use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Global configuration, resolved once from the environment.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);

/// Runtime configuration for the proxy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Ergast-compatible API, trailing slash included.
    pub ergast_base_url: String,

    /// Port the HTTP server listens on.
    pub port: u16,

    /// Constructor id the standings/status widgets focus on.
    pub focus_constructor: String,

    /// Timeout applied to every upstream request.
    pub upstream_timeout: Duration,

    /// Delay used to coalesce rapid successive selection changes.
    pub debounce: Duration,
}

impl Config {
    /// Resolve configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            ergast_base_url: with_trailing_slash(
                env::var("ERGAST_API_BASE_URL")
                    .unwrap_or_else(|_| "https://ergast.com/api/f1/".to_string()),
            ),
            port: parse_env("PORT", 3000),
            focus_constructor: env::var("FOCUS_CONSTRUCTOR")
                .unwrap_or_else(|_| "aston_martin".to_string()),
            upstream_timeout: Duration::from_millis(parse_env("UPSTREAM_TIMEOUT_MS", 10_000)),
            debounce: Duration::from_millis(parse_env("DEBOUNCE_MS", 300)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ergast_base_url: "https://ergast.com/api/f1/".to_string(),
            port: 3000,
            focus_constructor: "aston_martin".to_string(),
            upstream_timeout: Duration::from_millis(10_000),
            debounce: Duration::from_millis(300),
        }
    }
}

/// Parse an env var, falling back to `default` when unset or malformed.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Upstream URLs are built by concatenation, so the base must end in `/`.
fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}
