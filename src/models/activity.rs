// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity model for storage and API.

use chrono::NaiveDate;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Kind of activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Run,
    Cycling,
}

impl ActivityType {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::Run => "run",
            ActivityType::Cycling => "cycling",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "run" => Ok(ActivityType::Run),
            "cycling" => Ok(ActivityType::Cycling),
            _ => Err(()),
        }
    }
}

/// Stored activity joined with its location's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: i64,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Calendar date, serialized as `YYYY-MM-DD`
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    /// Kilometers
    pub distance: f64,
    /// Minutes
    pub duration: f64,
    /// km/h, derived from distance and duration at last write
    pub avg_speed: f64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub location_id: i64,
    pub location_name: String,
}

/// Validated activity fields, ready to be written.
///
/// `avg_speed` is absent; the store derives it on every write.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub activity_type: ActivityType,
    pub date: NaiveDate,
    pub distance: f64,
    pub duration: f64,
    pub location_id: i64,
}

/// Optional filters for activity listings. All bounds are inclusive.
///
/// Serializes to the list endpoint's query parameters, unset filters omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<i64>,
    /// Matched verbatim against the stored type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_serializes_camel_case() {
        let activity = Activity {
            id: 1,
            activity_type: ActivityType::Run,
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            distance: 10.0,
            duration: 60.0,
            avg_speed: 10.0,
            location_id: 4,
            location_name: "Park".to_string(),
        };

        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["type"], "run");
        assert_eq!(json["date"], "2024-03-09");
        assert_eq!(json["avgSpeed"], 10.0);
        assert_eq!(json["locationId"], 4);
        assert_eq!(json["locationName"], "Park");
    }

    #[test]
    fn test_filter_serializes_set_params_only() {
        let json = serde_json::to_value(ActivityFilter::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));

        let filter = ActivityFilter {
            location_id: Some(3),
            activity_type: Some("run".to_string()),
            from: NaiveDate::from_ymd_opt(2024, 1, 1),
            to: None,
        };
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"locationId": 3, "type": "run", "from": "2024-01-01"})
        );
    }
}
