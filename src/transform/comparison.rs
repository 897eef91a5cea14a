//! Comparison series transform.
//!
//! Takes the raw per-driver values fetched for each statistic and produces
//! the chart-ready series the comparison widget plots. Lower-is-better
//! statistics (position, fastest lap) are inverted so that across every
//! series a taller bar always means better performance:
//!
//! ```text
//! Raw input (per statistic)        →  Chart series
//! ┌──────────────────────────┐       ┌───────────────────────────────┐
//! │ alonso:  position 4      │       │ alonso:  inverted 15, raw 4   │
//! │ stroll:  position 10     │  →    │ stroll:  inverted 9,  raw 10  │
//! │ sargeant: position 18    │       │ sargeant: inverted 1, raw 18  │
//! └──────────────────────────┘       └───────────────────────────────┘
//! ```
//!
//! The inversion pivot is `max(raw)` over the *currently selected* driver
//! set only, recomputed on every call: shrinking the selection changes the
//! inverted values even though the raw values are unchanged.
//!
//! Null raw values (driver has no data for the season) are dropped from
//! the output series rather than plotted as zero - a zero bar would assert
//! a measured worst-case value that does not exist.

use std::collections::HashMap;

use crate::models::{ComparisonSeriesPoint, DriverStatValue, Statistic};

/// Raw comparison data, one value sequence per statistic.
pub type ComparisonRaw = HashMap<Statistic, Vec<DriverStatValue>>;

/// Chart-ready comparison data.
pub type ComparisonSeries = HashMap<Statistic, Vec<ComparisonSeriesPoint>>;

/// Transform raw per-driver statistic values into chart-ready series.
///
/// Every known statistic is present in the output; a statistic that is
/// absent from `raw` (or has no usable values) maps to an empty series.
/// Pure and deterministic; key order carries no meaning.
pub fn build_comparison(raw: &ComparisonRaw) -> ComparisonSeries {
    Statistic::ALL
        .iter()
        .map(|&stat| {
            let values = raw.get(&stat).map(Vec::as_slice).unwrap_or(&[]);
            (stat, series_for(stat, values))
        })
        .collect()
}

/// Build one statistic's series, applying inversion where the statistic
/// reads "lower is better".
fn series_for(stat: Statistic, values: &[DriverStatValue]) -> Vec<ComparisonSeriesPoint> {
    if !stat.lower_is_better() {
        return values
            .iter()
            .filter_map(|v| v.value.map(|raw| point(&v.name, raw, raw)))
            .collect();
    }

    // Pivot over the non-null values of this call's input only.
    let max = values
        .iter()
        .filter_map(|v| v.value)
        .fold(f64::NEG_INFINITY, f64::max);

    values
        .iter()
        .filter_map(|v| v.value.map(|raw| point(&v.name, raw, max - raw + 1.0)))
        .collect()
}

fn point(name: &str, original: f64, inverted: f64) -> ComparisonSeriesPoint {
    ComparisonSeriesPoint {
        name: name.to_string(),
        original_value: original,
        inverted_value: inverted,
    }
}
