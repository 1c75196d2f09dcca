// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity CRUD routes and the filtered summary.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use super::{parse_id, JsonBody, QueryParams};
use crate::db::sqlite::ACTIVITY_NOT_FOUND;
use crate::error::{AppError, Result};
use crate::metrics::{summarize, ActivitySummary};
use crate::models::Activity;
use crate::services::{validate_activity, validate_activity_filter, ActivityInput, ActivityQuery};
use crate::time_utils::today_local;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", get(list_activities).post(create_activity))
        .route("/api/activities/summary", get(get_summary))
        .route(
            "/api/activities/{id}",
            get(get_activity)
                .put(update_activity)
                .delete(delete_activity),
        )
}

/// List activities, optionally filtered by location, type and date range.
async fn list_activities(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<ActivityQuery>,
) -> Result<Json<Vec<Activity>>> {
    let filter = validate_activity_filter(&params)?;
    tracing::debug!(?filter, "Fetching activities");

    Ok(Json(state.db.list_activities(filter).await?))
}

/// Aggregate figures over the same filtered set `list_activities` returns.
async fn get_summary(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<ActivityQuery>,
) -> Result<Json<ActivitySummary>> {
    let filter = validate_activity_filter(&params)?;
    let activities = state.db.list_activities(filter).await?;

    Ok(Json(summarize(&activities)))
}

async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Activity>> {
    let id = parse_id(&raw_id, ACTIVITY_NOT_FOUND)?;
    let activity = state
        .db
        .get_activity(id)
        .await?
        .ok_or_else(|| AppError::NotFound(ACTIVITY_NOT_FOUND.to_string()))?;
    Ok(Json(activity))
}

async fn create_activity(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody<ActivityInput>,
) -> Result<(StatusCode, Json<Activity>)> {
    let activity = validate_activity(&input, today_local())?;
    let created = state.db.create_activity(activity).await?;

    tracing::info!(
        id = created.id,
        location_id = created.location_id,
        "Activity created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// Existence is checked before the body is validated.
async fn update_activity(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    JsonBody(input): JsonBody<ActivityInput>,
) -> Result<Json<Activity>> {
    let id = parse_id(&raw_id, ACTIVITY_NOT_FOUND)?;
    if state.db.get_activity(id).await?.is_none() {
        return Err(AppError::NotFound(ACTIVITY_NOT_FOUND.to_string()));
    }

    let activity = validate_activity(&input, today_local())?;
    let updated = state.db.update_activity(id, activity).await?;

    tracing::info!(id, "Activity updated");
    Ok(Json(updated))
}

async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_id(&raw_id, ACTIVITY_NOT_FOUND)?;
    state.db.delete_activity(id).await?;

    tracing::info!(id, "Activity deleted");
    Ok(StatusCode::NO_CONTENT)
}
