//! HTTP server for the dashboard API.
//!
//! Thin proxy over the Ergast API: every endpoint fetches upstream data,
//! re-shapes it for one dashboard widget, and relays it with permissive
//! CORS. No state is kept between requests.
//!
//! # API Endpoints
//!
//! | Method | Path                                  | Widget                      |
//! |--------|---------------------------------------|-----------------------------|
//! | GET    | `/health`                             | Health check                |
//! | GET    | `/api/races-completed`                | Races-completed counter     |
//! | GET    | `/api/team-standings`                 | Focus team standings        |
//! | GET    | `/api/current-status`                 | Focus team status breakdown |
//! | GET    | `/api/countdown`                      | Next-race countdown         |
//! | GET    | `/api/constructor-points-progress`    | Teams points progression    |
//! | GET    | `/api/seasons`                        | Season select               |
//! | GET    | `/api/drivers/{season}`               | Driver select               |
//! | GET    | `/api/races/{season}`                 | Race select                 |
//! | GET    | `/api/race/{season}/{round}`          | Raw race data               |
//! | GET    | `/api/race/{season}/{round}/timeline` | Race-event timeline chart   |
//! | POST   | `/api/driver-comparison`              | Driver comparison chart     |

use axum::{
    extract::{Path, State},
    http::{header, Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use futures::future::join_all;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;

use super::types::{
    error_response, ordinal_suffix, ComparisonRequest, CountdownResponse, RacesCompletedResponse,
    StatusResponse, StatusSection, TeamStandingsResponse, TimelineResponse,
};
use crate::config::CONFIG;
use crate::error::UpstreamError;
use crate::models::{driver_lookup, DriverRef, DriverStatValue, RaceData, Statistic};
use crate::transform::{build_comparison, reconstruct, ComparisonRaw, ComparisonSeries};
use crate::upstream::{types::Race, ErgastClient};

/// Error shape every handler returns: status plus JSON error payload.
type ApiError = (StatusCode, Json<Value>);

#[derive(Clone)]
struct AppState {
    client: ErgastClient,
    focus_constructor: String,
}

/// Start the HTTP server.
pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState {
        client: ErgastClient::new(&CONFIG)?,
        focus_constructor: CONFIG.focus_constructor.clone(),
    };

    // The dashboard is served from a different origin during development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/races-completed", get(races_completed))
        .route("/api/team-standings", get(team_standings))
        .route("/api/current-status", get(current_status))
        .route("/api/countdown", get(countdown))
        .route("/api/constructor-points-progress", get(constructor_points_progress))
        .route("/api/seasons", get(seasons))
        .route("/api/drivers/{season}", get(drivers))
        .route("/api/races/{season}", get(races))
        .route("/api/race/{season}/{round}", get(race_data))
        .route("/api/race/{season}/{round}/timeline", get(race_timeline))
        .route("/api/driver-comparison", post(driver_comparison))
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🏁 apexboard proxy running on http://localhost:{}", port);
    println!("   Upstream: {}", CONFIG.ergast_base_url);
    println!("   Focus constructor: {}", CONFIG.focus_constructor);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "apexboard",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Log an upstream failure and map it to the widget-facing error message.
fn fetch_failure(message: &'static str, err: UpstreamError) -> ApiError {
    log::error!("{message}: {err}");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(error_response(message)))
}

async fn races_completed(
    State(state): State<AppState>,
) -> Result<Json<RacesCompletedResponse>, ApiError> {
    let (season, races_completed) = state
        .client
        .races_completed()
        .await
        .map_err(|e| fetch_failure("Failed to fetch race data", e))?;
    Ok(Json(RacesCompletedResponse { season, races_completed }))
}

async fn team_standings(
    State(state): State<AppState>,
) -> Result<Json<TeamStandingsResponse>, ApiError> {
    let (standing, round) = state
        .client
        .constructor_standing(&state.focus_constructor)
        .await
        .map_err(|e| fetch_failure("Failed to fetch standings data", e))?;

    Ok(Json(TeamStandingsResponse {
        points: standing.points,
        position: standing.position.as_deref().and_then(ordinal_suffix),
        round: round.as_deref().and_then(ordinal_suffix),
        wins: standing.wins,
    }))
}

async fn current_status(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    let status = state
        .client
        .constructor_status(&state.focus_constructor)
        .await
        .map_err(|e| fetch_failure("Failed to fetch standings data", e))?;

    let sections = status
        .into_iter()
        .map(|s| StatusSection { number: s.count.parse().unwrap_or(0), label: s.status })
        .collect();

    Ok(Json(StatusResponse { title: "Status".to_string(), sections }))
}

async fn countdown(State(state): State<AppState>) -> Result<Json<CountdownResponse>, ApiError> {
    let race = state
        .client
        .next_race()
        .await
        .map_err(|e| fetch_failure("Failed to fetch countdown data", e))?;

    Ok(Json(CountdownResponse {
        race_name: race.race_name,
        season: race.season,
        date: race.date,
        time: race.time,
    }))
}

async fn constructor_points_progress(
    State(state): State<AppState>,
) -> Result<Json<HashMap<String, BTreeMap<String, i64>>>, ApiError> {
    let progress = state
        .client
        .constructor_points_progress()
        .await
        .map_err(|e| fetch_failure("Failed to fetch constructor points data", e))?;
    Ok(Json(progress))
}

async fn seasons(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let seasons = state
        .client
        .seasons()
        .await
        .map_err(|e| fetch_failure("Failed to fetch seasons data", e))?;
    Ok(Json(seasons))
}

async fn drivers(
    State(state): State<AppState>,
    Path(season): Path<String>,
) -> Result<Json<Vec<DriverRef>>, ApiError> {
    let drivers = state
        .client
        .drivers(&season)
        .await
        .map_err(|e| fetch_failure("Failed to fetch drivers", e))?;
    Ok(Json(drivers))
}

async fn races(
    State(state): State<AppState>,
    Path(season): Path<String>,
) -> Result<Json<Vec<Race>>, ApiError> {
    let races = state
        .client
        .races(&season)
        .await
        .map_err(|e| fetch_failure("Failed to fetch races", e))?;
    Ok(Json(races))
}

async fn race_data(
    State(state): State<AppState>,
    Path((season, round)): Path<(String, String)>,
) -> Result<Json<RaceData>, ApiError> {
    let data = state
        .client
        .race_data(&season, &round)
        .await
        .map_err(|e| fetch_failure("Failed to fetch race data", e))?;
    Ok(Json(data))
}

/// Race data and driver roster fetched in parallel, then reconstructed
/// into the timeline event sequence. An empty `events` array is the
/// dashboard's "no data" signal, not an error.
async fn race_timeline(
    State(state): State<AppState>,
    Path((season, round)): Path<(String, String)>,
) -> Result<Json<TimelineResponse>, ApiError> {
    let (data, roster) = tokio::try_join!(
        state.client.race_data(&season, &round),
        state.client.drivers(&season),
    )
    .map_err(|e| fetch_failure("Failed to fetch race data", e))?;

    let names = driver_lookup(&roster);
    let events = reconstruct(&data.pit_stops, &data.laps, &names);
    if events.is_empty() {
        log::warn!("no timeline events for {season} round {round}");
    }
    Ok(Json(TimelineResponse { events }))
}

/// Per-driver facts backing one comparison request.
struct DriverFacts {
    name: String,
    position: Option<f64>,
    points: Option<f64>,
    fastest: Option<f64>,
}

async fn driver_comparison(
    State(state): State<AppState>,
    Json(request): Json<ComparisonRequest>,
) -> Result<Json<ComparisonSeries>, ApiError> {
    if request.season.is_empty() || request.drivers.is_empty() || request.statistics.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(error_response("Invalid input parameters")),
        ));
    }

    let want_fastest = request.statistics.contains(&Statistic::FastestLap);

    // One fan-out per driver; each fetches standings (and results for the
    // fastest-lap average) concurrently.
    let fetches = request
        .drivers
        .iter()
        .map(|driver_id| driver_facts(&state.client, &request.season, driver_id, want_fastest));
    let facts: Vec<DriverFacts> = join_all(fetches)
        .await
        .into_iter()
        .collect::<Result<_, _>>()
        .map_err(|e| fetch_failure("Failed to fetch driver comparison data", e))?;

    let raw = comparison_raw(&facts, &request.statistics);
    Ok(Json(build_comparison(&raw)))
}

/// Fetch one driver's comparison facts. A driver with no standings entry
/// yields null values under its raw id - missing data, never an error.
async fn driver_facts(
    client: &ErgastClient,
    season: &str,
    driver_id: &str,
    want_fastest: bool,
) -> Result<DriverFacts, UpstreamError> {
    let (standing, fastest) = tokio::try_join!(
        client.driver_standing(season, driver_id),
        async {
            if want_fastest {
                client.average_fastest_lap(season, driver_id).await
            } else {
                Ok(None)
            }
        },
    )?;

    let facts = match standing {
        Some(standing) => DriverFacts {
            name: standing
                .driver
                .map(|d| d.display_name())
                .unwrap_or_else(|| driver_id.to_string()),
            position: standing.position.as_deref().and_then(|p| p.trim().parse().ok()),
            points: standing.points.trim().parse().ok(),
            fastest,
        },
        None => {
            log::warn!("no standings data found for driver {driver_id} in season {season}");
            DriverFacts { name: driver_id.to_string(), position: None, points: None, fastest }
        }
    };
    Ok(facts)
}

/// Assemble the raw comparison input for the requested statistics only;
/// the transform fills the unrequested keys with empty series.
fn comparison_raw(facts: &[DriverFacts], statistics: &[Statistic]) -> ComparisonRaw {
    let mut raw = ComparisonRaw::new();
    for &stat in statistics {
        let values = facts
            .iter()
            .map(|f| {
                let value = match stat {
                    Statistic::Position => f.position,
                    Statistic::Points => f.points,
                    Statistic::FastestLap => f.fastest,
                };
                DriverStatValue::new(f.name.clone(), value)
            })
            .collect();
        raw.insert(stat, values);
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn facts(name: &str, position: Option<f64>, points: Option<f64>) -> DriverFacts {
        DriverFacts { name: name.into(), position, points, fastest: None }
    }

    #[test]
    fn test_comparison_raw_keeps_driver_order_and_nulls() {
        let all = [
            facts("Fernando Alonso", Some(4.0), Some(206.0)),
            facts("devries", None, None),
        ];
        let raw = comparison_raw(&all, &[Statistic::Position, Statistic::Points]);

        let positions = &raw[&Statistic::Position];
        assert_eq!(positions[0], DriverStatValue::new("Fernando Alonso", Some(4.0)));
        assert_eq!(positions[1], DriverStatValue::new("devries", None));
        assert!(!raw.contains_key(&Statistic::FastestLap));
    }

    #[tokio::test]
    async fn test_health_shape() {
        let Json(body) = health().await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "apexboard");
    }

    #[tokio::test]
    async fn test_driver_comparison_rejects_empty_selection() {
        let state = AppState {
            client: ErgastClient::new(&Config::default()).unwrap(),
            focus_constructor: "aston_martin".into(),
        };
        let request = ComparisonRequest {
            season: "2023".into(),
            drivers: vec![],
            statistics: vec![Statistic::Points],
        };

        let result = driver_comparison(State(state), Json(request)).await;
        let (status, Json(body)) = result.err().expect("empty drivers must be rejected");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid input parameters");
    }
}
