// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CSV export of activity lists, shaped for spreadsheet import.
//!
//! Semicolon-delimited, UTF-8 with a byte-order mark, CRLF line endings.

use crate::metrics::pace;
use crate::models::Activity;
use crate::time_utils::format_iso_date;

pub const DELIMITER: char = ';';
pub const BOM: char = '\u{feff}';

pub const HEADER: [&str; 8] = [
    "id",
    "date",
    "type",
    "distance_km",
    "duration_min",
    "pace_min_per_km",
    "avg_speed_kmh",
    "location",
];

/// Quote a field if it contains the delimiter, a quote, or a line break.
pub fn escape_field(value: &str) -> String {
    if value.contains(&[DELIMITER, '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// One CSV row per activity. Pace is blank for anything but runs.
pub fn activity_row(activity: &Activity) -> [String; 8] {
    let pace = pace(activity.activity_type, activity.duration, activity.distance);
    let pace = if pace.is_applicable() {
        pace.to_string()
    } else {
        String::new()
    };

    [
        activity.id.to_string(),
        format_iso_date(activity.date),
        activity.activity_type.to_string(),
        activity.distance.to_string(),
        activity.duration.to_string(),
        pace,
        activity.avg_speed.to_string(),
        activity.location_name.clone(),
    ]
}

/// Render activities as a complete CSV document, header included.
pub fn activities_csv(activities: &[Activity]) -> String {
    let mut rows = Vec::with_capacity(activities.len() + 1);
    rows.push(join_row(HEADER.iter().copied()));
    for activity in activities {
        let row = activity_row(activity);
        rows.push(join_row(row.iter().map(String::as_str)));
    }

    let mut out = String::new();
    out.push(BOM);
    out.push_str(&rows.join("\r\n"));
    out
}

fn join_row<'a>(fields: impl Iterator<Item = &'a str>) -> String {
    fields
        .map(escape_field)
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string())
}
