// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQLite store with typed operations.
//!
//! Provides high-level operations for:
//! - Locations (with case-insensitive unique names)
//! - Activities (joined with their location's name)
//!
//! Every public operation runs on the blocking pool and holds the connection
//! for exactly its own scope. Operations that check before writing do so
//! inside one transaction.

use crate::db::schema::{CURRENT_VERSION, SCHEMA_V1, SCHEMA_VERSION_TABLE};
use crate::db::{ConstraintKind, StoreError};
use crate::metrics::average_speed;
use crate::models::{Activity, ActivityFilter, Location, NewActivity, NewLocation};
use crate::time_utils::format_iso_date;
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};

pub const LOCATION_NOT_FOUND: &str = "Location not found";
pub const ACTIVITY_NOT_FOUND: &str = "Activity not found";
pub const SELECTED_LOCATION_MISSING: &str = "Selected location does not exist";
pub const DUPLICATE_LOCATION_NAME: &str = "Location with this name already exists";
pub const LOCATION_IN_USE: &str = "Cannot delete location because it has activities";

const SELECT_LOCATION: &str = "SELECT id, name, terrain, difficulty, note FROM locations";

const SELECT_ACTIVITY: &str = "SELECT a.id, a.type, a.date, a.distance, a.duration, \
     a.avgSpeed, a.locationId, l.name \
     FROM activities a JOIN locations l ON l.id = a.locationId";

/// SQLite database handle, cheap to clone.
#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

impl Db {
    /// Open or create a database file and bring its schema up to date.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Open(e.to_string()))?;
        }

        let conn = Connection::open(path).map_err(|e| StoreError::Open(e.to_string()))?;
        tracing::info!(path = %path.display(), "Opened SQLite database");

        Self::from_connection(conn)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Open(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(mut conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| StoreError::Open(e.to_string()))?;
        initialize(&mut conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn call<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StoreError::Worker("connection mutex poisoned".to_string()))?;
            f(&mut *guard)
        })
        .await
        .map_err(|e| StoreError::Worker(e.to_string()))?
    }

    // ─── Location Operations ─────────────────────────────────────

    /// All locations, newest first.
    pub async fn list_locations(&self) -> Result<Vec<Location>, StoreError> {
        self.call(|conn| {
            let mut stmt = conn.prepare(&format!("{} ORDER BY id DESC", SELECT_LOCATION))?;
            let locations = stmt
                .query_map([], location_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(locations)
        })
        .await
    }

    pub async fn get_location(&self, id: i64) -> Result<Option<Location>, StoreError> {
        self.call(move |conn| fetch_location(conn, id)).await
    }

    /// Insert a location and return the stored row.
    pub async fn create_location(&self, location: NewLocation) -> Result<Location, StoreError> {
        self.call(move |conn| {
            let tx = conn.transaction()?;
            ensure_name_available(&tx, &location.name, None)?;

            tx.execute(
                "INSERT INTO locations (name, terrain, difficulty, note) VALUES (?1, ?2, ?3, ?4)",
                params![
                    location.name,
                    location.terrain.as_str(),
                    location.difficulty,
                    location.note
                ],
            )
            .map_err(duplicate_name)?;

            let id = tx.last_insert_rowid();
            let created = fetch_location(&tx, id)?
                .ok_or_else(|| StoreError::NotFound(LOCATION_NOT_FOUND.to_string()))?;
            tx.commit()?;

            tracing::debug!(id, name = %created.name, "Location created");
            Ok(created)
        })
        .await
    }

    /// Replace every field of an existing location.
    pub async fn update_location(
        &self,
        id: i64,
        location: NewLocation,
    ) -> Result<Location, StoreError> {
        self.call(move |conn| {
            let tx = conn.transaction()?;
            ensure_name_available(&tx, &location.name, Some(id))?;

            let changed = tx
                .execute(
                    "UPDATE locations SET name = ?1, terrain = ?2, difficulty = ?3, note = ?4 \
                     WHERE id = ?5",
                    params![
                        location.name,
                        location.terrain.as_str(),
                        location.difficulty,
                        location.note,
                        id
                    ],
                )
                .map_err(duplicate_name)?;
            if changed == 0 {
                return Err(StoreError::NotFound(LOCATION_NOT_FOUND.to_string()));
            }

            let updated = fetch_location(&tx, id)?
                .ok_or_else(|| StoreError::NotFound(LOCATION_NOT_FOUND.to_string()))?;
            tx.commit()?;

            tracing::debug!(id, "Location updated");
            Ok(updated)
        })
        .await
    }

    /// Delete a location that no activity references.
    pub async fn delete_location(&self, id: i64) -> Result<(), StoreError> {
        self.call(move |conn| {
            let tx = conn.transaction()?;
            if !location_exists(&tx, id)? {
                return Err(StoreError::NotFound(LOCATION_NOT_FOUND.to_string()));
            }

            let in_use: i64 = tx.query_row(
                "SELECT COUNT(*) FROM activities WHERE locationId = ?1",
                [id],
                |row| row.get(0),
            )?;
            if in_use > 0 {
                return Err(StoreError::Constraint {
                    kind: ConstraintKind::ForeignKey,
                    message: LOCATION_IN_USE.to_string(),
                });
            }

            tx.execute("DELETE FROM locations WHERE id = ?1", [id])
                .map_err(|e| {
                    StoreError::from(e)
                        .with_constraint_message(ConstraintKind::ForeignKey, LOCATION_IN_USE)
                })?;
            tx.commit()?;

            tracing::debug!(id, "Location deleted");
            Ok(())
        })
        .await
    }

    // ─── Activity Operations ─────────────────────────────────────

    /// Activities matching `filter`, newest date first.
    pub async fn list_activities(&self, filter: ActivityFilter) -> Result<Vec<Activity>, StoreError> {
        self.call(move |conn| query_activities(conn, &filter)).await
    }

    /// Activities at one location. Fails if the location does not exist.
    pub async fn list_activities_for_location(
        &self,
        location_id: i64,
    ) -> Result<Vec<Activity>, StoreError> {
        self.call(move |conn| {
            let tx = conn.transaction()?;
            if !location_exists(&tx, location_id)? {
                return Err(StoreError::NotFound(LOCATION_NOT_FOUND.to_string()));
            }
            let filter = ActivityFilter {
                location_id: Some(location_id),
                ..Default::default()
            };
            let activities = query_activities(&tx, &filter)?;
            tx.commit()?;
            Ok(activities)
        })
        .await
    }

    pub async fn get_activity(&self, id: i64) -> Result<Option<Activity>, StoreError> {
        self.call(move |conn| fetch_activity(conn, id)).await
    }

    /// Insert an activity at an existing location, deriving its average speed.
    pub async fn create_activity(&self, activity: NewActivity) -> Result<Activity, StoreError> {
        self.call(move |conn| {
            let tx = conn.transaction()?;
            if !location_exists(&tx, activity.location_id)? {
                return Err(StoreError::NotFound(SELECTED_LOCATION_MISSING.to_string()));
            }

            tx.execute(
                "INSERT INTO activities (type, date, distance, duration, avgSpeed, locationId) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    activity.activity_type.as_str(),
                    activity.date,
                    activity.distance,
                    activity.duration,
                    average_speed(activity.distance, activity.duration),
                    activity.location_id
                ],
            )?;

            let id = tx.last_insert_rowid();
            let created = fetch_activity(&tx, id)?
                .ok_or_else(|| StoreError::NotFound(ACTIVITY_NOT_FOUND.to_string()))?;
            tx.commit()?;

            tracing::debug!(
                id,
                location_id = created.location_id,
                avg_speed = created.avg_speed,
                "Activity created"
            );
            Ok(created)
        })
        .await
    }

    /// Replace every field of an existing activity, re-deriving its average speed.
    pub async fn update_activity(
        &self,
        id: i64,
        activity: NewActivity,
    ) -> Result<Activity, StoreError> {
        self.call(move |conn| {
            let tx = conn.transaction()?;
            if !activity_exists(&tx, id)? {
                return Err(StoreError::NotFound(ACTIVITY_NOT_FOUND.to_string()));
            }
            if !location_exists(&tx, activity.location_id)? {
                return Err(StoreError::NotFound(SELECTED_LOCATION_MISSING.to_string()));
            }

            tx.execute(
                "UPDATE activities SET type = ?1, date = ?2, distance = ?3, duration = ?4, \
                 avgSpeed = ?5, locationId = ?6 WHERE id = ?7",
                params![
                    activity.activity_type.as_str(),
                    activity.date,
                    activity.distance,
                    activity.duration,
                    average_speed(activity.distance, activity.duration),
                    activity.location_id,
                    id
                ],
            )?;

            let updated = fetch_activity(&tx, id)?
                .ok_or_else(|| StoreError::NotFound(ACTIVITY_NOT_FOUND.to_string()))?;
            tx.commit()?;

            tracing::debug!(id, avg_speed = updated.avg_speed, "Activity updated");
            Ok(updated)
        })
        .await
    }

    pub async fn delete_activity(&self, id: i64) -> Result<(), StoreError> {
        self.call(move |conn| {
            let deleted = conn.execute("DELETE FROM activities WHERE id = ?1", [id])?;
            if deleted == 0 {
                return Err(StoreError::NotFound(ACTIVITY_NOT_FOUND.to_string()));
            }
            tracing::debug!(id, "Activity deleted");
            Ok(())
        })
        .await
    }
}

// ─── Schema ──────────────────────────────────────────────────

fn initialize(conn: &mut Connection) -> Result<(), StoreError> {
    conn.execute_batch(SCHEMA_VERSION_TABLE)
        .map_err(|e| StoreError::Migration(e.to_string()))?;

    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
        .map_err(|e| StoreError::Migration(e.to_string()))?;

    if current_version < CURRENT_VERSION {
        migrate(conn, current_version)?;
    }
    Ok(())
}

fn migrate(conn: &mut Connection, from_version: i32) -> Result<(), StoreError> {
    let tx = conn
        .transaction()
        .map_err(|e| StoreError::Migration(e.to_string()))?;

    if from_version < 1 {
        tx.execute_batch(SCHEMA_V1)
            .map_err(|e| StoreError::Migration(e.to_string()))?;
    }

    tx.execute(
        "INSERT INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
        [CURRENT_VERSION],
    )
    .map_err(|e| StoreError::Migration(e.to_string()))?;
    tx.commit()
        .map_err(|e| StoreError::Migration(e.to_string()))?;

    tracing::info!(
        from = from_version,
        to = CURRENT_VERSION,
        "Database schema migrated"
    );
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────

fn duplicate_name(err: rusqlite::Error) -> StoreError {
    StoreError::from(err).with_constraint_message(ConstraintKind::Unique, DUPLICATE_LOCATION_NAME)
}

/// Case-insensitive name check across all locations except `exclude_id`.
///
/// The `LOWER(name)` index only folds ASCII; this also catches `Č`/`č`.
fn ensure_name_available(
    conn: &Connection,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<(), StoreError> {
    let wanted = name.to_lowercase();
    let mut stmt = conn.prepare("SELECT id, name FROM locations")?;
    let mut rows = stmt.query([])?;

    while let Some(row) = rows.next()? {
        let id: i64 = row.get(0)?;
        let existing: String = row.get(1)?;
        if Some(id) != exclude_id && existing.to_lowercase() == wanted {
            return Err(StoreError::Constraint {
                kind: ConstraintKind::Unique,
                message: DUPLICATE_LOCATION_NAME.to_string(),
            });
        }
    }
    Ok(())
}

fn location_exists(conn: &Connection, id: i64) -> Result<bool, StoreError> {
    Ok(conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM locations WHERE id = ?1)",
        [id],
        |row| row.get(0),
    )?)
}

fn activity_exists(conn: &Connection, id: i64) -> Result<bool, StoreError> {
    Ok(conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM activities WHERE id = ?1)",
        [id],
        |row| row.get(0),
    )?)
}

fn fetch_location(conn: &Connection, id: i64) -> Result<Option<Location>, StoreError> {
    Ok(conn
        .query_row(
            &format!("{} WHERE id = ?1", SELECT_LOCATION),
            [id],
            location_from_row,
        )
        .optional()?)
}

fn fetch_activity(conn: &Connection, id: i64) -> Result<Option<Activity>, StoreError> {
    Ok(conn
        .query_row(
            &format!("{} WHERE a.id = ?1", SELECT_ACTIVITY),
            [id],
            activity_from_row,
        )
        .optional()?)
}

fn query_activities(conn: &Connection, filter: &ActivityFilter) -> Result<Vec<Activity>, StoreError> {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    if let Some(location_id) = filter.location_id {
        clauses.push("a.locationId = ?");
        values.push(Value::Integer(location_id));
    }
    if let Some(activity_type) = &filter.activity_type {
        clauses.push("a.type = ?");
        values.push(Value::Text(activity_type.clone()));
    }
    if let Some(from) = filter.from {
        clauses.push("a.date >= ?");
        values.push(Value::Text(format_iso_date(from)));
    }
    if let Some(to) = filter.to {
        clauses.push("a.date <= ?");
        values.push(Value::Text(format_iso_date(to)));
    }

    let mut sql = String::from(SELECT_ACTIVITY);
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY a.date DESC, a.id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let activities = stmt
        .query_map(params_from_iter(values), activity_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(activities)
}

#[derive(Debug, thiserror::Error)]
#[error("unexpected value {0:?}")]
struct UnexpectedValue(String);

fn unexpected(column: usize, value: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(UnexpectedValue(value)))
}

fn location_from_row(row: &Row<'_>) -> rusqlite::Result<Location> {
    let terrain: String = row.get(2)?;
    let difficulty: i64 = row.get(3)?;

    Ok(Location {
        id: row.get(0)?,
        name: row.get(1)?,
        terrain: terrain.parse().map_err(|_| unexpected(2, terrain.clone()))?,
        difficulty: u8::try_from(difficulty).map_err(|_| unexpected(3, difficulty.to_string()))?,
        note: row.get(4)?,
    })
}

fn activity_from_row(row: &Row<'_>) -> rusqlite::Result<Activity> {
    let activity_type: String = row.get(1)?;

    Ok(Activity {
        id: row.get(0)?,
        activity_type: activity_type
            .parse()
            .map_err(|_| unexpected(1, activity_type.clone()))?,
        date: row.get(2)?,
        distance: row.get(3)?,
        duration: row.get(4)?,
        avg_speed: row.get(5)?,
        location_id: row.get(6)?,
        location_name: row.get(7)?,
    })
}
