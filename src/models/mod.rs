//! Domain models for the apexboard transform core.
//!
//! This module contains the data structures shared by the transforms and
//! the HTTP layer:
//!
//! - [`Statistic`] - the three comparable driver statistics
//! - [`DriverStatValue`] - one raw statistic value per driver (nullable)
//! - [`ComparisonSeriesPoint`] - chart-ready point with inverted value
//! - [`PitStopRecord`] / [`LapRecord`] - re-shaped race data
//! - [`RaceEvent`] - one labeled point on the race timeline
//! - [`DriverRef`] - driver id with display name
//!
//! All JSON field names are camelCase to match what the dashboard widgets
//! already consume.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

// =============================================================================
// Statistics
// =============================================================================

/// A driver statistic the comparison chart can plot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Statistic {
    /// Final championship position (lower is better).
    Position,
    /// Championship points (higher is better).
    Points,
    /// Average fastest-lap time in seconds (lower is better).
    FastestLap,
}

impl Statistic {
    /// All statistics the dashboard knows, in display order.
    pub const ALL: [Statistic; 3] = [Statistic::Position, Statistic::Points, Statistic::FastestLap];

    /// Parse from the wire key used by the dashboard selects.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "position" => Some(Self::Position),
            "points" => Some(Self::Points),
            "fastestLap" => Some(Self::FastestLap),
            _ => None,
        }
    }

    /// Wire key for this statistic.
    pub fn as_key(&self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Points => "points",
            Self::FastestLap => "fastestLap",
        }
    }

    /// Whether a smaller raw value means better performance.
    ///
    /// Lower-is-better statistics get inverted for display so the tallest
    /// bar is always the best driver.
    pub fn lower_is_better(&self) -> bool {
        matches!(self, Self::Position | Self::FastestLap)
    }
}

// =============================================================================
// Comparison values
// =============================================================================

/// One raw statistic value for one driver.
///
/// `value` is `None` when upstream has no data for that driver/season
/// combination; that absence propagates instead of failing. The wire value
/// may be a JSON number, a decimal-seconds string (the fastest-lap case),
/// or null - strings are parsed to floating point on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriverStatValue {
    pub name: String,
    #[serde(default, deserialize_with = "de_numeric_or_null")]
    pub value: Option<f64>,
}

impl DriverStatValue {
    pub fn new(name: impl Into<String>, value: Option<f64>) -> Self {
        Self { name: name.into(), value }
    }
}

/// Accept a number, a numeric string, or null. Unparsable strings degrade
/// to null rather than aborting the whole payload.
fn de_numeric_or_null<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// A chart-ready comparison point.
///
/// `inverted_value` is what gets plotted; `original_value` is what the
/// tooltip shows. For lower-is-better statistics the inversion maps the
/// worst driver in the selected set to 1 and the best to the set maximum.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSeriesPoint {
    pub name: String,
    pub original_value: f64,
    pub inverted_value: f64,
}

// =============================================================================
// Race data
// =============================================================================

/// One pit stop, re-shaped from the Ergast race table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PitStopRecord {
    pub driver_id: String,
    pub lap: u32,
    pub stop: u32,
    /// Wall-clock time of the stop, `HH:MM:SS`.
    pub time: String,
    /// Duration in seconds, kept verbatim as upstream reports it.
    pub duration: String,
}

/// One driver's timing within a lap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LapTiming {
    pub driver_id: String,
    pub time: String,
}

/// One lap with all per-driver timings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LapRecord {
    pub lap: u32,
    pub timings: Vec<LapTiming>,
}

/// Re-shaped race data served to the dashboard and fed to the
/// timeline reconstructor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RaceData {
    pub laps: Vec<LapRecord>,
    pub pit_stops: Vec<PitStopRecord>,
}

// =============================================================================
// Timeline events
// =============================================================================

/// One labeled event on the race timeline.
///
/// Rebuilt fully on every race selection; never cached across races.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RaceEvent {
    /// Marker label, e.g. the driver name or `"<driver> Lap Time"`.
    pub name: String,
    /// Human-readable event description shown in the tooltip.
    pub description: String,
    /// Plotted time of day, `HH:MM:SS` on the timeline's fixed axis.
    pub time: String,
    /// Driver the event belongs to; drives the marker style.
    pub driver_id: Option<String>,
}

// =============================================================================
// Drivers
// =============================================================================

/// A driver with its display name, as served by `/api/drivers/{season}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriverRef {
    pub driver_id: String,
    pub name: String,
}

/// Reduce a driver roster into the id -> display-name lookup both event
/// producers consume. Built once per race-data fetch.
pub fn driver_lookup(drivers: &[DriverRef]) -> HashMap<String, String> {
    drivers
        .iter()
        .map(|d| (d.driver_id.clone(), d.name.clone()))
        .collect()
}
