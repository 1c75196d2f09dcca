// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived metrics: average speed, pace, and aggregate summaries.
//!
//! Everything here is pure. The server stores `average_speed` on every
//! activity write; the API client reuses the same function for form previews.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{Activity, ActivityType};

/// Marker rendered when pace does not apply.
pub const NOT_APPLICABLE: &str = "–";

/// Round to two decimal places, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Average speed in km/h from kilometers and minutes, rounded to 2 decimals.
pub fn average_speed(distance_km: f64, duration_min: f64) -> f64 {
    round2(distance_km / (duration_min / 60.0))
}

/// Minutes-per-kilometer pace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    PerKm { minutes: u64, seconds: u8 },
    NotApplicable,
}

impl Pace {
    /// Pace from total minutes over total kilometers.
    ///
    /// Not applicable unless both inputs are finite and positive.
    pub fn from_totals(duration_min: f64, distance_km: f64) -> Pace {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(duration_min) || !valid(distance_km) {
            return Pace::NotApplicable;
        }

        let pace = duration_min / distance_km;
        let mut minutes = pace.floor();
        let mut seconds = ((pace - minutes) * 60.0).round();
        // 4:59.6 rounds up to a whole minute.
        if seconds >= 60.0 {
            minutes += 1.0;
            seconds = 0.0;
        }

        Pace::PerKm {
            minutes: minutes as u64,
            seconds: seconds as u8,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Pace::PerKm { .. })
    }
}

/// Pace of a single activity. Only runs have one.
pub fn pace(activity_type: ActivityType, duration_min: f64, distance_km: f64) -> Pace {
    match activity_type {
        ActivityType::Run => Pace::from_totals(duration_min, distance_km),
        ActivityType::Cycling => Pace::NotApplicable,
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pace::PerKm { minutes, seconds } => write!(f, "{}:{:02} min/km", minutes, seconds),
            Pace::NotApplicable => f.write_str(NOT_APPLICABLE),
        }
    }
}

/// Serialized as `"m:ss min/km"` or `null`.
impl Serialize for Pace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Pace::PerKm { .. } => serializer.serialize_some(&self.to_string()),
            Pace::NotApplicable => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Pace {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(Pace::NotApplicable);
        };

        let invalid =
            || <D::Error as serde::de::Error>::custom(format!("invalid pace: {:?}", raw));
        let value = raw.strip_suffix(" min/km").ok_or_else(invalid)?;
        let (minutes, seconds) = value.split_once(':').ok_or_else(invalid)?;
        let minutes = minutes.parse::<u64>().map_err(|_| invalid())?;
        let seconds = seconds.parse::<u8>().map_err(|_| invalid())?;
        if seconds >= 60 {
            return Err(invalid());
        }
        Ok(Pace::PerKm { minutes, seconds })
    }
}

/// Format whole minutes as `h:mm h`.
pub fn format_total_time(total_minutes: f64) -> String {
    let minutes = if total_minutes.is_finite() {
        total_minutes.round().max(0.0) as u64
    } else {
        0
    };
    format!("{}:{:02} h", minutes / 60, minutes % 60)
}

/// Aggregate figures over a set of activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub count: usize,
    /// Kilometers, 2 decimals
    pub total_distance: f64,
    /// Whole minutes
    pub total_duration: u64,
    /// `h:mm h`
    pub total_time: String,
    /// km/h over the whole set, 0 when no time was recorded
    pub avg_speed: f64,
    /// Fastest single activity, 0 when empty
    pub best_speed: f64,
    /// Average pace over runs only
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub avg_pace: Pace,
    pub has_runs: bool,
}

/// Summarize a set of activities.
pub fn summarize(activities: &[Activity]) -> ActivitySummary {
    let mut total_distance = 0.0;
    let mut total_duration = 0.0;
    let mut best_speed: f64 = 0.0;
    let mut run_distance = 0.0;
    let mut run_duration = 0.0;

    for activity in activities {
        total_distance += activity.distance;
        total_duration += activity.duration;
        best_speed = best_speed.max(activity.avg_speed);

        if activity.activity_type == ActivityType::Run {
            run_distance += activity.distance;
            run_duration += activity.duration;
        }
    }

    let avg_speed = if total_duration > 0.0 {
        total_distance / (total_duration / 60.0)
    } else {
        0.0
    };

    let has_runs = run_distance > 0.0;
    let avg_pace = if has_runs {
        Pace::from_totals(run_duration, run_distance)
    } else {
        Pace::NotApplicable
    };

    ActivitySummary {
        count: activities.len(),
        total_distance: round2(total_distance),
        total_duration: total_duration.round().max(0.0) as u64,
        total_time: format_total_time(total_duration),
        avg_speed: round2(avg_speed),
        best_speed: round2(best_speed),
        avg_pace,
        has_runs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_activity(activity_type: ActivityType, distance: f64, duration: f64) -> Activity {
        Activity {
            id: 1,
            activity_type,
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            distance,
            duration,
            avg_speed: average_speed(distance, duration),
            location_id: 1,
            location_name: "Park".to_string(),
        }
    }

    #[test]
    fn test_average_speed() {
        assert_eq!(average_speed(10.0, 60.0), 10.0);
        assert_eq!(average_speed(21.1, 90.0), 14.07);
        assert_eq!(average_speed(5.0, 25.0), 12.0);
        assert_eq!(average_speed(1.0, 7.0), 8.57);
    }

    #[test]
    fn test_round2_halves_away_from_zero() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(14.066_666), 14.07);
        assert_eq!(round2(10.0), 10.0);
    }

    #[test]
    fn test_pace_for_runs_only() {
        assert_eq!(
            pace(ActivityType::Run, 50.0, 10.0),
            Pace::PerKm {
                minutes: 5,
                seconds: 0
            }
        );
        assert_eq!(pace(ActivityType::Cycling, 50.0, 10.0), Pace::NotApplicable);
        assert!(!pace(ActivityType::Cycling, 50.0, 10.0).is_applicable());
        assert_eq!(pace(ActivityType::Run, 0.0, 10.0), Pace::NotApplicable);
        assert_eq!(pace(ActivityType::Run, 30.0, 0.0), Pace::NotApplicable);
    }

    #[test]
    fn test_pace_formatting() {
        // 5.5 min/km
        assert_eq!(pace(ActivityType::Run, 55.0, 10.0).to_string(), "5:30 min/km");
        // 6.05 min/km -> 6:03
        assert_eq!(pace(ActivityType::Run, 60.5, 10.0).to_string(), "6:03 min/km");
        assert_eq!(Pace::NotApplicable.to_string(), "–");
    }

    #[test]
    fn test_pace_seconds_roll_over() {
        // 4.995 min/km rounds to 60 seconds
        assert_eq!(
            Pace::from_totals(49.95, 10.0),
            Pace::PerKm {
                minutes: 5,
                seconds: 0
            }
        );
    }

    #[test]
    fn test_pace_serde() {
        let pace = Pace::PerKm {
            minutes: 4,
            seconds: 7,
        };
        let json = serde_json::to_value(pace).unwrap();
        assert_eq!(json, "4:07 min/km");
        assert_eq!(serde_json::from_value::<Pace>(json).unwrap(), pace);

        let json = serde_json::to_value(Pace::NotApplicable).unwrap();
        assert!(json.is_null());
        assert_eq!(
            serde_json::from_value::<Pace>(json).unwrap(),
            Pace::NotApplicable
        );
    }

    #[test]
    fn test_format_total_time() {
        assert_eq!(format_total_time(0.0), "0:00 h");
        assert_eq!(format_total_time(59.6), "1:00 h");
        assert_eq!(format_total_time(135.0), "2:15 h");
        assert_eq!(format_total_time(-4.0), "0:00 h");
    }

    #[test]
    fn test_summary_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.total_distance, 0.0);
        assert_eq!(summary.total_duration, 0);
        assert_eq!(summary.avg_speed, 0.0);
        assert_eq!(summary.best_speed, 0.0);
        assert_eq!(summary.avg_pace, Pace::NotApplicable);
        assert!(!summary.has_runs);
    }

    #[test]
    fn test_summary_mixed() {
        let activities = vec![
            make_activity(ActivityType::Run, 10.0, 50.0),
            make_activity(ActivityType::Run, 5.0, 30.0),
            make_activity(ActivityType::Cycling, 40.0, 100.0),
        ];

        let summary = summarize(&activities);

        assert_eq!(summary.count, 3);
        assert_eq!(summary.total_distance, 55.0);
        assert_eq!(summary.total_duration, 180);
        assert_eq!(summary.total_time, "3:00 h");
        // 55 km over 3 h
        assert_eq!(summary.avg_speed, 18.33);
        assert_eq!(summary.best_speed, 24.0);
        // runs only: 80 min over 15 km = 5.333 min/km
        assert_eq!(
            summary.avg_pace,
            Pace::PerKm {
                minutes: 5,
                seconds: 20
            }
        );
        assert!(summary.has_runs);
    }

    #[test]
    fn test_summary_cycling_only_has_no_pace() {
        let activities = vec![make_activity(ActivityType::Cycling, 30.0, 60.0)];
        let summary = summarize(&activities);

        assert_eq!(summary.avg_speed, 30.0);
        assert_eq!(summary.avg_pace, Pace::NotApplicable);
        assert!(!summary.has_runs);
    }
}
