//! Race-event timeline reconstruction.
//!
//! Merges a race's pit stops and lap timings into one chronologically
//! ordered event sequence for the timeline chart:
//!
//! ```text
//! Pit stops ──┐
//!             ├──▶ labeled events ──▶ stable sort on 2023-01-01T<time>Z
//! Lap times ──┘
//! ```
//!
//! Pit stops carry a real wall-clock time and are plotted verbatim. Lap
//! timings carry a per-lap duration, not a time of day, so their plotted
//! time is *derived*: the raw string's minute field plus the lap number,
//! re-assembled on a fixed 12-o'clock axis. This spreads the laps across
//! the chart's hour and is isolated in [`derived_lap_clock`] so it can be
//! replaced without touching the merge/sort logic. Unlike the plain string
//! splice it replaces, the derived minute is zero-padded so the assembled
//! string stays temporally ordered.
//!
//! The whole reconstruction fails soft: events whose time cannot be
//! interpreted (malformed fields, derived minute past 59) are excluded
//! with a warning instead of aborting the race view.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use log::warn;
use std::collections::HashMap;

use crate::models::{LapRecord, PitStopRecord, RaceEvent};

/// Why a lap timing could not be placed on the clock axis.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ClockError {
    /// The raw timing string does not have the expected colon fields.
    Malformed,
    /// Minute field plus lap number passed 59; wrapping would sort the
    /// event before earlier laps, so it is excluded instead.
    MinuteOverflow,
}

/// Rebuild the full event sequence for one race.
///
/// Pit-stop events are emitted first, then lap-timing events; the sort is
/// stable, so events sharing a plotted time keep that insertion order.
/// Empty inputs produce an empty sequence - the caller's "no data" state.
pub fn reconstruct(
    pit_stops: &[PitStopRecord],
    laps: &[LapRecord],
    driver_names: &HashMap<String, String>,
) -> Vec<RaceEvent> {
    let mut timed: Vec<(NaiveDateTime, RaceEvent)> = Vec::new();

    for stop in pit_stops {
        let event = RaceEvent {
            name: display_name(driver_names, &stop.driver_id),
            description: format!(
                "Lap {}: Pit stop duration of {} seconds.",
                stop.lap, stop.duration
            ),
            time: stop.time.clone(),
            driver_id: Some(stop.driver_id.clone()),
        };
        match event_timestamp(&event.time) {
            Some(ts) => timed.push((ts, event)),
            None => warn!(
                "excluding pit stop for {} with unparsable time {:?}",
                stop.driver_id, stop.time
            ),
        }
    }

    for lap in laps {
        for timing in &lap.timings {
            let time = match derived_lap_clock(&timing.time, lap.lap) {
                Ok(time) => time,
                Err(ClockError::Malformed) => {
                    warn!(
                        "excluding lap {} timing for {} with malformed time {:?}",
                        lap.lap, timing.driver_id, timing.time
                    );
                    continue;
                }
                Err(ClockError::MinuteOverflow) => {
                    warn!(
                        "excluding lap {} timing for {}: derived minute past 59 ({:?})",
                        lap.lap, timing.driver_id, timing.time
                    );
                    continue;
                }
            };
            let event = RaceEvent {
                name: format!("{} Lap Time", display_name(driver_names, &timing.driver_id)),
                description: format!("Lap {}: Time - {}", lap.lap, timing.time),
                time,
                driver_id: Some(timing.driver_id.clone()),
            };
            match event_timestamp(&event.time) {
                Some(ts) => timed.push((ts, event)),
                None => warn!(
                    "excluding lap {} timing for {} with unsortable derived time {:?}",
                    lap.lap, timing.driver_id, event.time
                ),
            }
        }
    }

    timed.sort_by(|a, b| a.0.cmp(&b.0));
    timed.into_iter().map(|(_, event)| event).collect()
}

/// Derive the plotted clock time for a lap timing.
///
/// Takes the raw timing string's second colon field as the minute, adds
/// the lap number, and reuses the third field verbatim as the seconds,
/// assembled as `"12:<minute>:<seconds>"`. Lap 2 at `"1:32:045"` becomes
/// `"12:34:045"`.
fn derived_lap_clock(raw: &str, lap: u32) -> Result<String, ClockError> {
    let fields: Vec<&str> = raw.split(':').collect();
    if fields.len() < 3 {
        return Err(ClockError::Malformed);
    }
    let minute: u32 = fields[1].trim().parse().map_err(|_| ClockError::Malformed)?;
    let derived = minute + lap;
    if derived > 59 {
        return Err(ClockError::MinuteOverflow);
    }
    Ok(format!("12:{:02}:{}", derived, fields[2]))
}

/// Interpret a plotted `HH:MM:SS` string as a timestamp on the timeline's
/// fixed calendar date (2023-01-01). The seconds field tolerates the
/// oddities the derivation produces (`"045"`, fractional `"34.494"`).
fn event_timestamp(time: &str) -> Option<NaiveDateTime> {
    let fields: Vec<&str> = time.split(':').collect();
    if fields.len() != 3 {
        return None;
    }
    let hour: u32 = fields[0].trim().parse().ok()?;
    let minute: u32 = fields[1].trim().parse().ok()?;
    let seconds: f64 = fields[2].trim().parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }

    let base = NaiveDate::from_ymd_opt(2023, 1, 1)?.and_hms_opt(hour, minute, 0)?;
    Some(base + Duration::milliseconds((seconds * 1000.0).round() as i64))
}

/// Display name for a driver id, falling back to the raw id when the
/// roster lookup has no entry.
fn display_name(driver_names: &HashMap<String, String>, driver_id: &str) -> String {
    driver_names
        .get(driver_id)
        .cloned()
        .unwrap_or_else(|| driver_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LapTiming;

    fn names(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect()
    }

    fn pit(driver: &str, lap: u32, time: &str, duration: &str) -> PitStopRecord {
        PitStopRecord {
            driver_id: driver.into(),
            lap,
            stop: 1,
            time: time.into(),
            duration: duration.into(),
        }
    }

    fn lap(number: u32, timings: &[(&str, &str)]) -> LapRecord {
        LapRecord {
            lap: number,
            timings: timings
                .iter()
                .map(|(d, t)| LapTiming { driver_id: d.to_string(), time: t.to_string() })
                .collect(),
        }
    }

    #[test]
    fn test_empty_inputs_yield_empty_sequence() {
        assert!(reconstruct(&[], &[], &HashMap::new()).is_empty());
    }

    #[test]
    fn test_derived_lap_clock_assembly() {
        // Minute field 32 + lap 2 = 34, seconds field reused verbatim.
        assert_eq!(derived_lap_clock("1:32:045", 2).unwrap(), "12:34:045");
        // Zero-padding keeps the assembled string ordered.
        assert_eq!(derived_lap_clock("1:05:12", 2).unwrap(), "12:07:12");
    }

    #[test]
    fn test_derived_lap_clock_rejects_overflow_and_garbage() {
        assert_eq!(derived_lap_clock("1:58:30", 5), Err(ClockError::MinuteOverflow));
        assert_eq!(derived_lap_clock("1:32.045", 2), Err(ClockError::Malformed));
        assert_eq!(derived_lap_clock("1:xx:045", 2), Err(ClockError::Malformed));
    }

    #[test]
    fn test_pit_stop_event_shape() {
        let events = reconstruct(
            &[pit("alonso", 14, "14:32:05", "21.5")],
            &[],
            &names(&[("alonso", "Fernando Alonso")]),
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "Fernando Alonso");
        assert_eq!(events[0].description, "Lap 14: Pit stop duration of 21.5 seconds.");
        assert_eq!(events[0].time, "14:32:05");
        assert_eq!(events[0].driver_id.as_deref(), Some("alonso"));
    }

    #[test]
    fn test_merge_orders_pit_stop_before_later_lap_time() {
        let events = reconstruct(
            &[pit("ver", 3, "12:05:30", "22.1")],
            &[lap(2, &[("ver", "1:05:12")])],
            &names(&[("ver", "Max Verstappen")]),
        );

        // Derived lap time is 12:07:12, so the pit stop comes first.
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].time, "12:05:30");
        assert_eq!(events[1].time, "12:07:12");
        assert_eq!(events[1].name, "Max Verstappen Lap Time");
        assert_eq!(events[1].description, "Lap 2: Time - 1:05:12");
    }

    #[test]
    fn test_sequence_is_non_decreasing() {
        let events = reconstruct(
            &[pit("a", 10, "12:20:00", "20.0"), pit("a", 20, "12:04:00", "20.0")],
            &[
                lap(1, &[("a", "1:10:30"), ("b", "1:12:00")]),
                lap(2, &[("a", "1:08:15")]),
            ],
            &HashMap::new(),
        );

        let stamps: Vec<_> = events.iter().map(|e| event_timestamp(&e.time).unwrap()).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(events.len(), 5);
    }

    #[test]
    fn test_identical_times_keep_insertion_order() {
        let events = reconstruct(
            &[pit("first", 5, "13:00:00", "19.0"), pit("second", 5, "13:00:00", "24.0")],
            &[],
            &names(&[("first", "First Driver"), ("second", "Second Driver")]),
        );
        assert_eq!(events[0].name, "First Driver");
        assert_eq!(events[1].name, "Second Driver");
    }

    #[test]
    fn test_malformed_times_are_excluded_not_fatal() {
        let events = reconstruct(
            &[pit("ok", 1, "12:01:00", "20.0"), pit("bad", 1, "not-a-time", "20.0")],
            &[lap(50, &[("ok", "1:30:500")])], // minute 30 + lap 50 overflows
            &HashMap::new(),
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].driver_id.as_deref(), Some("ok"));
    }

    #[test]
    fn test_unknown_driver_falls_back_to_id() {
        let events = reconstruct(&[pit("mystery", 1, "12:00:01", "18.2")], &[], &HashMap::new());
        assert_eq!(events[0].name, "mystery");
    }

    #[test]
    fn test_timestamp_tolerates_odd_seconds_fields() {
        let padded = event_timestamp("12:34:045").unwrap();
        let fractional = event_timestamp("12:34:44.494").unwrap();
        assert!(padded > fractional);
        assert!(event_timestamp("12:34").is_none());
        assert!(event_timestamp("12:61:00").is_none());
    }
}
