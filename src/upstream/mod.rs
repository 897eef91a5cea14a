//! Ergast API client.
//!
//! Thin typed wrapper over the public Ergast motorsport API. Each method
//! fetches one endpoint and reduces the `MRData` envelope to the piece the
//! proxy serves. The client is cheap to clone (reqwest pools connections
//! internally) and carries no state beyond the base URL.
//!
//! Missing data is not an error at this layer: a driver without standings
//! yields `None`, an absent race table yields empty collections. Only
//! transport failures, non-success statuses, and undecodable bodies
//! surface as [`UpstreamError`].

pub mod types;

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

use crate::config::Config;
use crate::error::{UpstreamError, UpstreamResult};
use crate::models::{DriverRef, LapRecord, LapTiming, PitStopRecord, RaceData};
use types::*;

/// Matches an Ergast lap duration, `M:SS.mmm`.
static LAP_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+):(\d{1,2}(?:\.\d+)?)$").expect("lap time regex"));

/// Client for the Ergast-compatible upstream API.
#[derive(Clone)]
pub struct ErgastClient {
    http: reqwest::Client,
    base_url: String,
}

impl ErgastClient {
    /// Build a client from configuration.
    pub fn new(config: &Config) -> UpstreamResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()?;
        Ok(Self { http, base_url: config.ergast_base_url.clone() })
    }

    /// Fetch one envelope. `path` is relative to the configured base URL.
    async fn get(&self, path: &str) -> UpstreamResult<MrData> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status { status: status.as_u16(), url });
        }

        let body = response.text().await?;
        let parsed: ErgastResponse = serde_json::from_str(&body)?;
        Ok(parsed.mrdata)
    }

    /// All championship seasons, oldest first.
    pub async fn seasons(&self) -> UpstreamResult<Vec<String>> {
        let data = self.get("seasons.json?limit=100").await?;
        Ok(data
            .season_table
            .map(|t| t.seasons.into_iter().map(|s| s.season).collect())
            .unwrap_or_default())
    }

    /// Driver roster for a season, reduced to id + display name.
    pub async fn drivers(&self, season: &str) -> UpstreamResult<Vec<DriverRef>> {
        let data = self.get(&format!("{season}/drivers.json")).await?;
        Ok(data
            .driver_table
            .map(|t| {
                t.drivers
                    .into_iter()
                    .map(|d| DriverRef { name: d.display_name(), driver_id: d.driver_id })
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Race calendar for a season, relayed with all upstream fields.
    pub async fn races(&self, season: &str) -> UpstreamResult<Vec<Race>> {
        let data = self.get(&format!("{season}.json?limit=100")).await?;
        Ok(data.race_table.map(|t| t.races).unwrap_or_default())
    }

    /// Current season label and the number of races completed so far.
    pub async fn races_completed(&self) -> UpstreamResult<(String, String)> {
        let data = self.get("current.json").await?;
        let season = data
            .race_table
            .and_then(|t| t.season)
            .ok_or_else(|| UpstreamError::MissingData("RaceTable.season".into()))?;
        let total = data
            .total
            .ok_or_else(|| UpstreamError::MissingData("MRData.total".into()))?;
        Ok((season, total))
    }

    /// The next scheduled race.
    pub async fn next_race(&self) -> UpstreamResult<Race> {
        let data = self.get("current/next.json").await?;
        data.race_table
            .and_then(|t| t.races.into_iter().next())
            .ok_or_else(|| UpstreamError::MissingData("RaceTable.Races[0]".into()))
    }

    /// Current constructor standing for one team, plus the round it covers.
    pub async fn constructor_standing(
        &self,
        constructor: &str,
    ) -> UpstreamResult<(ConstructorStanding, Option<String>)> {
        let data = self
            .get(&format!("current/constructors/{constructor}/constructorStandings.json"))
            .await?;
        let list = data
            .standings_table
            .and_then(|t| t.standings_lists.into_iter().next())
            .ok_or_else(|| UpstreamError::MissingData("StandingsLists[0]".into()))?;
        let round = list.round;
        let standing = list
            .constructor_standings
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::MissingData("ConstructorStandings[0]".into()))?;
        Ok((standing, round))
    }

    /// Season-finish status counts for one team (Finished, Collision, ...).
    pub async fn constructor_status(&self, constructor: &str) -> UpstreamResult<Vec<StatusCount>> {
        let data = self
            .get(&format!("current/constructors/{constructor}/status.json"))
            .await?;
        Ok(data.status_table.map(|t| t.status).unwrap_or_default())
    }

    /// Every team's points per season, across the whole championship
    /// history.
    pub async fn constructor_points_progress(
        &self,
    ) -> UpstreamResult<HashMap<String, BTreeMap<String, i64>>> {
        let data = self
            .get("constructorStandings.json?offset=0&limit=910")
            .await?;
        let lists = data.standings_table.map(|t| t.standings_lists).unwrap_or_default();
        Ok(points_progress(&lists))
    }

    /// One driver's championship standing for a season. `None` when the
    /// driver has no standings entry - missing data, not an error.
    pub async fn driver_standing(
        &self,
        season: &str,
        driver_id: &str,
    ) -> UpstreamResult<Option<DriverStanding>> {
        let data = self
            .get(&format!("{season}/drivers/{driver_id}/driverStandings.json"))
            .await?;
        Ok(data
            .standings_table
            .and_then(|t| t.standings_lists.into_iter().next())
            .and_then(|list| list.driver_standings.into_iter().next()))
    }

    /// Average of one driver's per-race fastest laps across a season, in
    /// seconds rounded to two decimals. `None` when no race produced a
    /// fastest lap for the driver.
    pub async fn average_fastest_lap(
        &self,
        season: &str,
        driver_id: &str,
    ) -> UpstreamResult<Option<f64>> {
        let data = self
            .get(&format!("{season}/drivers/{driver_id}/results.json"))
            .await?;
        let races = data.race_table.map(|t| t.races).unwrap_or_default();
        Ok(average_fastest_lap_seconds(&races, driver_id))
    }

    /// Pit stops and lap timings for one race, fetched in parallel and
    /// re-shaped for the dashboard.
    pub async fn race_data(&self, season: &str, round: &str) -> UpstreamResult<RaceData> {
        let pit_stops_path = format!("{season}/{round}/pitstops.json");
        let laps_path = format!("{season}/{round}/laps.json");
        let (pit_stops, laps) =
            tokio::try_join!(self.get(&pit_stops_path), self.get(&laps_path))?;
        Ok(RaceData {
            pit_stops: reshape_pit_stops(first_race(pit_stops)),
            laps: reshape_laps(first_race(laps)),
        })
    }
}

/// Pull the first (and for per-race endpoints, only) race out of an
/// envelope, if any.
fn first_race(data: MrData) -> Option<Race> {
    data.race_table.and_then(|t| t.races.into_iter().next())
}

/// Re-shape raw pit stops: numeric strings parsed, everything else verbatim.
fn reshape_pit_stops(race: Option<Race>) -> Vec<PitStopRecord> {
    race.map(|r| r.pit_stops)
        .unwrap_or_default()
        .into_iter()
        .map(|stop| PitStopRecord {
            driver_id: stop.driver_id,
            lap: stop.lap.parse().unwrap_or(0),
            stop: stop.stop.parse().unwrap_or(0),
            time: stop.time,
            duration: stop.duration,
        })
        .collect()
}

/// Re-shape raw laps into numbered lap records with per-driver timings.
fn reshape_laps(race: Option<Race>) -> Vec<LapRecord> {
    race.map(|r| r.laps)
        .unwrap_or_default()
        .into_iter()
        .map(|lap| LapRecord {
            lap: lap.number.parse().unwrap_or(0),
            timings: lap
                .timings
                .into_iter()
                .map(|t| LapTiming { driver_id: t.driver_id, time: t.time })
                .collect(),
        })
        .collect()
}

/// Parse an Ergast lap duration (`M:SS.mmm`) into seconds.
pub fn parse_lap_time(raw: &str) -> Option<f64> {
    let captures = LAP_TIME_RE.captures(raw.trim())?;
    let minutes: f64 = captures[1].parse().ok()?;
    let seconds: f64 = captures[2].parse().ok()?;
    Some(minutes * 60.0 + seconds)
}

/// Mean of the driver's per-race fastest laps, two-decimal rounded.
/// Races with no fastest lap for the driver are skipped.
fn average_fastest_lap_seconds(races: &[Race], driver_id: &str) -> Option<f64> {
    let laps: Vec<f64> = races
        .iter()
        .filter_map(|race| {
            let result = race
                .results
                .iter()
                .find(|r| r.driver.as_ref().is_some_and(|d| d.driver_id == driver_id))?;
            let time = result.fastest_lap.as_ref()?.time.as_ref()?;
            parse_lap_time(&time.time)
        })
        .collect();

    if laps.is_empty() {
        return None;
    }
    let mean = laps.iter().sum::<f64>() / laps.len() as f64;
    Some((mean * 100.0).round() / 100.0)
}

/// Fold all-seasons standings lists into `{team -> {season -> points}}`.
fn points_progress(lists: &[StandingsList]) -> HashMap<String, BTreeMap<String, i64>> {
    let mut progress: HashMap<String, BTreeMap<String, i64>> = HashMap::new();
    for list in lists {
        let Some(season) = list.season.as_deref() else { continue };
        for standing in &list.constructor_standings {
            let Some(constructor) = standing.constructor.as_ref() else { continue };
            let points = standing
                .points
                .parse::<f64>()
                .map(|p| p as i64)
                .unwrap_or(0);
            progress
                .entry(constructor.name.clone())
                .or_default()
                .insert(season.to_string(), points);
        }
    }
    progress
}

#[cfg(test)]
mod tests {
    use super::*;

    fn race_with_fastest_lap(driver_id: &str, time: &str) -> Race {
        Race {
            results: vec![RaceResult {
                driver: Some(DriverInfo {
                    driver_id: driver_id.into(),
                    ..Default::default()
                }),
                fastest_lap: Some(FastestLap {
                    time: Some(LapTimeValue { time: time.into() }),
                }),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_lap_time() {
        assert_eq!(parse_lap_time("1:32.045"), Some(92.045));
        assert_eq!(parse_lap_time("0:59.9"), Some(59.9));
        assert_eq!(parse_lap_time("2:03"), Some(123.0));
        assert_eq!(parse_lap_time("no lap"), None);
        assert_eq!(parse_lap_time("1:345.0"), None);
    }

    #[test]
    fn test_average_fastest_lap_skips_races_without_one() {
        let races = vec![
            race_with_fastest_lap("alonso", "1:30.000"),
            // Different driver's result only
            race_with_fastest_lap("stroll", "1:28.000"),
            race_with_fastest_lap("alonso", "1:32.000"),
        ];
        // (90 + 92) / 2
        assert_eq!(average_fastest_lap_seconds(&races, "alonso"), Some(91.0));
    }

    #[test]
    fn test_average_fastest_lap_none_when_no_laps() {
        assert_eq!(average_fastest_lap_seconds(&[], "alonso"), None);
        let races = vec![race_with_fastest_lap("stroll", "1:28.000")];
        assert_eq!(average_fastest_lap_seconds(&races, "alonso"), None);
    }

    #[test]
    fn test_average_fastest_lap_rounds_to_two_decimals() {
        let races = vec![
            race_with_fastest_lap("alonso", "1:30.001"),
            race_with_fastest_lap("alonso", "1:30.002"),
        ];
        assert_eq!(average_fastest_lap_seconds(&races, "alonso"), Some(90.0));
    }

    #[test]
    fn test_reshape_race_data() {
        let race = Race {
            pit_stops: vec![PitStop {
                driver_id: "alonso".into(),
                lap: "11".into(),
                stop: "1".into(),
                time: "13:22:18".into(),
                duration: "24.561".into(),
            }],
            laps: vec![Lap {
                number: "1".into(),
                timings: vec![Timing { driver_id: "ver".into(), time: "1:45.678".into() }],
            }],
            ..Default::default()
        };

        let stops = reshape_pit_stops(Some(race.clone()));
        assert_eq!(stops[0].lap, 11);
        assert_eq!(stops[0].duration, "24.561");

        let laps = reshape_laps(Some(race));
        assert_eq!(laps[0].lap, 1);
        assert_eq!(laps[0].timings[0].time, "1:45.678");

        // A race with no data at all is empty, not an error.
        assert!(reshape_pit_stops(None).is_empty());
        assert!(reshape_laps(None).is_empty());
    }

    #[test]
    fn test_points_progress_fold() {
        let lists = vec![
            StandingsList {
                season: Some("2022".into()),
                constructor_standings: vec![ConstructorStanding {
                    points: "55".into(),
                    constructor: Some(ConstructorInfo {
                        constructor_id: "aston_martin".into(),
                        name: "Aston Martin".into(),
                    }),
                    ..Default::default()
                }],
                ..Default::default()
            },
            StandingsList {
                season: Some("2023".into()),
                constructor_standings: vec![ConstructorStanding {
                    points: "280".into(),
                    constructor: Some(ConstructorInfo {
                        constructor_id: "aston_martin".into(),
                        name: "Aston Martin".into(),
                    }),
                    ..Default::default()
                }],
                ..Default::default()
            },
        ];

        let progress = points_progress(&lists);
        assert_eq!(progress["Aston Martin"]["2022"], 55);
        assert_eq!(progress["Aston Martin"]["2023"], 280);
    }
}
