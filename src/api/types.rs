//! REST API types for the dashboard widgets.
//!
//! Field names match what the widgets already consume (camelCase), so the
//! responses are drop-in for the existing charts.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::{RaceEvent, Statistic};

/// Body of `POST /api/driver-comparison`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRequest {
    pub season: String,
    /// Driver ids to compare.
    pub drivers: Vec<String>,
    /// Statistics to fetch and invert.
    pub statistics: Vec<Statistic>,
}

/// `GET /api/races-completed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RacesCompletedResponse {
    pub season: String,
    /// Race count as upstream reports it (a numeric string).
    pub races_completed: String,
}

/// `GET /api/team-standings` - the focus constructor's season summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStandingsResponse {
    pub points: String,
    /// Ordinal position, e.g. `"5th"`; absent when upstream omits it.
    pub position: Option<String>,
    /// Ordinal round the standings cover, e.g. `"22nd"`.
    pub round: Option<String>,
    pub wins: String,
}

/// `GET /api/current-status` - widget-shaped status breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub title: String,
    pub sections: Vec<StatusSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSection {
    pub number: i64,
    pub label: String,
}

/// `GET /api/countdown` - the next race, for the countdown widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownResponse {
    pub race_name: String,
    pub season: String,
    pub date: String,
    pub time: Option<String>,
}

/// `GET /api/race/{season}/{round}/timeline`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineResponse {
    /// Chronologically ordered race events; empty means "no data".
    pub events: Vec<RaceEvent>,
}

/// Error payload served with non-success statuses.
pub fn error_response(error: &str) -> Value {
    json!({
        "requestId": Uuid::new_v4().to_string(),
        "error": error,
    })
}

/// Render a numeric string as an English ordinal (`"3"` -> `"3rd"`).
/// Non-numeric or zero input yields `None`, matching the widgets'
/// "no value yet" state.
pub fn ordinal_suffix(value: &str) -> Option<String> {
    let n: u64 = value.trim().parse().ok()?;
    if n == 0 {
        return None;
    }
    let suffix = match n % 100 {
        11..=13 => "th",
        _ => match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    };
    Some(format!("{n}{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ordinal_suffix() {
        assert_eq!(ordinal_suffix("1").as_deref(), Some("1st"));
        assert_eq!(ordinal_suffix("2").as_deref(), Some("2nd"));
        assert_eq!(ordinal_suffix("3").as_deref(), Some("3rd"));
        assert_eq!(ordinal_suffix("4").as_deref(), Some("4th"));
        assert_eq!(ordinal_suffix("11").as_deref(), Some("11th"));
        assert_eq!(ordinal_suffix("12").as_deref(), Some("12th"));
        assert_eq!(ordinal_suffix("13").as_deref(), Some("13th"));
        assert_eq!(ordinal_suffix("21").as_deref(), Some("21st"));
        assert_eq!(ordinal_suffix("22").as_deref(), Some("22nd"));
        assert_eq!(ordinal_suffix("101").as_deref(), Some("101st"));
    }

    #[test]
    fn test_ordinal_suffix_rejects_non_numbers_and_zero() {
        assert_eq!(ordinal_suffix("0"), None);
        assert_eq!(ordinal_suffix(""), None);
        assert_eq!(ordinal_suffix("abc"), None);
    }

    #[test]
    fn test_comparison_request_wire_format() {
        let request: ComparisonRequest = serde_json::from_value(json!({
            "season": "2023",
            "drivers": ["alonso", "stroll"],
            "statistics": ["position", "points", "fastestLap"]
        }))
        .unwrap();
        assert_eq!(request.drivers.len(), 2);
        assert_eq!(request.statistics[2], Statistic::FastestLap);
    }

    #[test]
    fn test_error_response_shape() {
        let body = error_response("Failed to fetch race data");
        assert_eq!(body["error"], "Failed to fetch race data");
        assert!(body["requestId"].as_str().is_some());
    }

    #[test]
    fn test_team_standings_serializes_camel_case() {
        let response = TeamStandingsResponse {
            points: "280".into(),
            position: Some("5th".into()),
            round: Some("22nd".into()),
            wins: "0".into(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["position"], "5th");
        assert_eq!(json["wins"], "0");
    }
}
