// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Location CRUD routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use super::{parse_id, JsonBody};
use crate::db::sqlite::LOCATION_NOT_FOUND;
use crate::error::{AppError, Result};
use crate::models::{Activity, Location};
use crate::services::{validate_location, LocationInput};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/locations", get(list_locations).post(create_location))
        .route(
            "/api/locations/{id}",
            get(get_location)
                .put(update_location)
                .delete(delete_location),
        )
        .route("/api/locations/{id}/activities", get(list_location_activities))
}

async fn list_locations(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Location>>> {
    Ok(Json(state.db.list_locations().await?))
}

async fn get_location(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Location>> {
    let id = parse_id(&raw_id, LOCATION_NOT_FOUND)?;
    let location = state
        .db
        .get_location(id)
        .await?
        .ok_or_else(|| AppError::NotFound(LOCATION_NOT_FOUND.to_string()))?;
    Ok(Json(location))
}

async fn create_location(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody<LocationInput>,
) -> Result<(StatusCode, Json<Location>)> {
    let location = validate_location(&input)?;
    let created = state.db.create_location(location).await?;

    tracing::info!(id = created.id, name = %created.name, "Location created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Existence is checked before the body is validated.
async fn update_location(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    JsonBody(input): JsonBody<LocationInput>,
) -> Result<Json<Location>> {
    let id = parse_id(&raw_id, LOCATION_NOT_FOUND)?;
    if state.db.get_location(id).await?.is_none() {
        return Err(AppError::NotFound(LOCATION_NOT_FOUND.to_string()));
    }

    let location = validate_location(&input)?;
    let updated = state.db.update_location(id, location).await?;

    tracing::info!(id, "Location updated");
    Ok(Json(updated))
}

/// Refused with 409 while any activity still references the location.
async fn delete_location(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_id(&raw_id, LOCATION_NOT_FOUND)?;
    state.db.delete_location(id).await?;

    tracing::info!(id, "Location deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn list_location_activities(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Vec<Activity>>> {
    let id = parse_id(&raw_id, LOCATION_NOT_FOUND)?;
    Ok(Json(state.db.list_activities_for_location(id).await?))
}
