// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Input validation for locations and activities.
//!
//! Request bodies arrive as loosely typed JSON. Each rule coerces its field
//! the way a form submission would (numeric strings count as numbers) and the
//! first failing field, in declaration order, is reported.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::db::sqlite::SELECTED_LOCATION_MISSING;
use crate::metrics::average_speed;
use crate::error::{AppError, Result};
use crate::models::{ActivityFilter, ActivityType, NewActivity, NewLocation, Terrain};
use crate::time_utils::parse_iso_date;

/// Raw location body.
#[derive(Debug, Default, Deserialize)]
pub struct LocationInput {
    pub name: Option<Value>,
    pub terrain: Option<Value>,
    pub difficulty: Option<Value>,
    pub note: Option<Value>,
}

/// Raw activity body. Any `avgSpeed` sent by the caller is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityInput {
    #[serde(rename = "type")]
    pub activity_type: Option<Value>,
    pub date: Option<Value>,
    pub distance: Option<Value>,
    pub duration: Option<Value>,
    pub location_id: Option<Value>,
}

/// Raw activity list query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityQuery {
    pub location_id: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Loose numeric coercion.
///
/// Numbers pass through, strings are trimmed and parsed (blank is zero),
/// booleans are 1/0. Null, missing, arrays and objects do not coerce.
pub fn coerce_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Coerce to a whole number.
fn coerce_integer(value: Option<&Value>) -> Option<f64> {
    coerce_number(value).filter(|n| n.is_finite() && n.fract() == 0.0)
}

/// Coerce to a finite number strictly greater than zero.
fn coerce_positive(value: Option<&Value>) -> Option<f64> {
    coerce_number(value).filter(|n| n.is_finite() && *n > 0.0)
}

pub fn validate_location(input: &LocationInput) -> Result<NewLocation> {
    let name = match &input.name {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => return Err(AppError::validation("name", "Name is required")),
    };

    let terrain = input
        .terrain
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Terrain>().ok())
        .ok_or_else(|| {
            AppError::validation("terrain", "Terrain must be one of: road, trail, forest")
        })?;

    let difficulty = coerce_integer(input.difficulty.as_ref())
        .filter(|d| (1.0..=5.0).contains(d))
        .ok_or_else(|| AppError::validation("difficulty", "Difficulty must be an integer 1–5"))?
        as u8;

    let note = match &input.note {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err(AppError::validation("note", "Note must be text")),
    };

    Ok(NewLocation {
        name,
        terrain,
        difficulty,
        note,
    })
}

/// Validate an activity body against `today` (the latest acceptable date).
///
/// A well-formed `locationId` is not looked up here; the store reports a
/// missing location as not found.
pub fn validate_activity(input: &ActivityInput, today: NaiveDate) -> Result<NewActivity> {
    let activity_type = input
        .activity_type
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<ActivityType>().ok())
        .ok_or_else(|| AppError::validation("type", "Type must be run or cycling"))?;

    let date = input
        .date
        .as_ref()
        .and_then(Value::as_str)
        .and_then(parse_iso_date)
        .ok_or_else(|| AppError::validation("date", "Date must be a valid ISO date YYYY-MM-DD"))?;
    if date > today {
        return Err(AppError::validation("date", "Date cannot be in the future"));
    }

    let distance = coerce_positive(input.distance.as_ref())
        .ok_or_else(|| AppError::validation("distance", "Distance must be > 0"))?;

    let duration = coerce_positive(input.duration.as_ref())
        .ok_or_else(|| AppError::validation("duration", "Duration must be > 0"))?;
    // The stored speed must survive a JSON round trip.
    if !average_speed(distance, duration).is_finite() {
        return Err(AppError::validation(
            "distance",
            "Distance is too large for the given duration",
        ));
    }

    let location_id = coerce_integer(input.location_id.as_ref())
        .ok_or_else(|| AppError::validation("locationId", "LocationId must be an integer"))?;
    // A whole number too large for a row id cannot name an existing location.
    if location_id < i64::MIN as f64 || location_id >= i64::MAX as f64 {
        return Err(AppError::NotFound(SELECTED_LOCATION_MISSING.to_string()));
    }

    Ok(NewActivity {
        activity_type,
        date,
        distance,
        duration,
        location_id: location_id as i64,
    })
}

/// Turn raw list query parameters into a typed filter.
///
/// Blank parameters are treated as absent.
pub fn validate_activity_filter(query: &ActivityQuery) -> Result<ActivityFilter> {
    fn present(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    let location_id = present(&query.location_id)
        .map(|raw| {
            raw.parse::<i64>()
                .map_err(|_| AppError::validation("locationId", "LocationId must be an integer"))
        })
        .transpose()?;

    let date_param = |field: &'static str, raw: &str| {
        parse_iso_date(raw).ok_or_else(|| {
            AppError::validation(
                field,
                format!("'{}' must be a valid ISO date YYYY-MM-DD", field),
            )
        })
    };
    let from = present(&query.from)
        .map(|raw| date_param("from", raw))
        .transpose()?;
    let to = present(&query.to)
        .map(|raw| date_param("to", raw))
        .transpose()?;

    Ok(ActivityFilter {
        location_id,
        activity_type: present(&query.activity_type).map(str::to_string),
        from,
        to,
    })
}
