//! Chart transform module.
//!
//! The two pure transforms behind the dashboard charts:
//! - Comparison: per-statistic series with lower-is-better inversion
//! - Timeline: pit stops + lap timings merged into one ordered sequence

pub mod comparison;
pub mod timeline;

pub use comparison::{build_comparison, ComparisonRaw, ComparisonSeries};
pub use timeline::reconstruct;
