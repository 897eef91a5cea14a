//! Serde models for the Ergast `MRData` response envelope.
//!
//! Only the tables and fields the proxy actually reads are typed; numeric
//! values arrive as strings (Ergast quirk) and are parsed at the point of
//! use. [`Race`] flattens unknown keys so the race list can be relayed to
//! the dashboard without losing upstream fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level wrapper: every Ergast payload is `{"MRData": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErgastResponse {
    #[serde(rename = "MRData")]
    pub mrdata: MrData,
}

/// The envelope body. Exactly one table is populated per endpoint.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MrData {
    /// Total row count for the query, as a string.
    pub total: Option<String>,
    #[serde(rename = "RaceTable")]
    pub race_table: Option<RaceTable>,
    #[serde(rename = "StandingsTable")]
    pub standings_table: Option<StandingsTable>,
    #[serde(rename = "SeasonTable")]
    pub season_table: Option<SeasonTable>,
    #[serde(rename = "DriverTable")]
    pub driver_table: Option<DriverTable>,
    #[serde(rename = "StatusTable")]
    pub status_table: Option<StatusTable>,
}

// =============================================================================
// Races
// =============================================================================

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RaceTable {
    pub season: Option<String>,
    #[serde(rename = "Races", default)]
    pub races: Vec<Race>,
}

/// A race entry. Known fields are typed; everything else (circuit, url,
/// session times, ...) is kept in `extra` and round-trips to the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Race {
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub round: String,
    #[serde(rename = "raceName", default)]
    pub race_name: String,
    #[serde(default)]
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(rename = "Results", default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<RaceResult>,
    #[serde(rename = "PitStops", default, skip_serializing_if = "Vec::is_empty")]
    pub pit_stops: Vec<PitStop>,
    #[serde(rename = "Laps", default, skip_serializing_if = "Vec::is_empty")]
    pub laps: Vec<Lap>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RaceResult {
    #[serde(rename = "Driver")]
    pub driver: Option<DriverInfo>,
    #[serde(rename = "FastestLap", skip_serializing_if = "Option::is_none")]
    pub fastest_lap: Option<FastestLap>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FastestLap {
    #[serde(rename = "Time")]
    pub time: Option<LapTimeValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LapTimeValue {
    /// Lap duration, `M:SS.mmm`.
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PitStop {
    #[serde(rename = "driverId", default)]
    pub driver_id: String,
    #[serde(default)]
    pub lap: String,
    #[serde(default)]
    pub stop: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub duration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Lap {
    #[serde(default)]
    pub number: String,
    #[serde(rename = "Timings", default)]
    pub timings: Vec<Timing>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Timing {
    #[serde(rename = "driverId", default)]
    pub driver_id: String,
    #[serde(default)]
    pub time: String,
}

// =============================================================================
// Standings
// =============================================================================

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StandingsTable {
    #[serde(rename = "StandingsLists", default)]
    pub standings_lists: Vec<StandingsList>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StandingsList {
    pub season: Option<String>,
    pub round: Option<String>,
    #[serde(rename = "DriverStandings", default)]
    pub driver_standings: Vec<DriverStanding>,
    #[serde(rename = "ConstructorStandings", default)]
    pub constructor_standings: Vec<ConstructorStanding>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DriverStanding {
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub points: String,
    #[serde(default)]
    pub wins: String,
    #[serde(rename = "Driver")]
    pub driver: Option<DriverInfo>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConstructorStanding {
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub points: String,
    #[serde(default)]
    pub wins: String,
    #[serde(rename = "Constructor")]
    pub constructor: Option<ConstructorInfo>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConstructorInfo {
    #[serde(rename = "constructorId", default)]
    pub constructor_id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DriverInfo {
    #[serde(rename = "driverId", default)]
    pub driver_id: String,
    #[serde(rename = "givenName", default)]
    pub given_name: String,
    #[serde(rename = "familyName", default)]
    pub family_name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl DriverInfo {
    /// `"<given> <family>"`, the display name used everywhere.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

// =============================================================================
// Seasons / Status
// =============================================================================

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SeasonTable {
    #[serde(rename = "Seasons", default)]
    pub seasons: Vec<Season>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Season {
    #[serde(default)]
    pub season: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DriverTable {
    #[serde(rename = "Drivers", default)]
    pub drivers: Vec<DriverInfo>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StatusTable {
    #[serde(rename = "Status", default)]
    pub status: Vec<StatusCount>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StatusCount {
    #[serde(default)]
    pub count: String,
    #[serde(default)]
    pub status: String,
}
