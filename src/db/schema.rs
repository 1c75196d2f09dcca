// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database schema definitions.

/// Current schema version. Bump when adding a migration.
pub const CURRENT_VERSION: i32 = 1;

/// Schema version bookkeeping table.
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Version 1: locations and activities.
pub const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS locations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    terrain TEXT NOT NULL CHECK (terrain IN ('road', 'trail', 'forest')),
    difficulty INTEGER NOT NULL CHECK (difficulty BETWEEN 1 AND 5),
    note TEXT
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_locations_name_ci
ON locations (LOWER(name));

CREATE TABLE IF NOT EXISTS activities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    type TEXT NOT NULL CHECK (type IN ('run', 'cycling')),
    date TEXT NOT NULL,
    distance REAL NOT NULL CHECK (distance > 0),
    duration REAL NOT NULL CHECK (duration > 0),
    avgSpeed REAL NOT NULL CHECK (avgSpeed >= 0),
    locationId INTEGER NOT NULL,
    FOREIGN KEY (locationId) REFERENCES locations(id) ON DELETE RESTRICT
);

CREATE INDEX IF NOT EXISTS idx_activities_location ON activities (locationId);
CREATE INDEX IF NOT EXISTS idx_activities_date ON activities (date DESC, id DESC);
"#;
