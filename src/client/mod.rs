// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed client for the TrackBuddy REST API.
//!
//! Any non-2xx response becomes [`ClientError::Api`] carrying the server's
//! message and, for validation failures, the offending field so forms can
//! show it inline.

pub mod query_slot;

pub use query_slot::{Generation, QuerySlot};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::metrics::{average_speed, ActivitySummary};
use crate::models::{Activity, ActivityFilter, ActivityType, Location, Terrain};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Api {
        status: u16,
        /// `VALIDATION_ERROR`, `NOT_FOUND`, `CONFLICT`, ...
        code: Option<String>,
        message: String,
        field: Option<String>,
    },
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(err) => err.status().map(|s| s.as_u16()),
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Api { code, .. } => code.as_deref(),
            ClientError::Http(_) => None,
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            ClientError::Api { field, .. } => field.as_deref(),
            ClientError::Http(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
    field: Option<String>,
}

/// Body for creating or updating a location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationPayload {
    pub name: String,
    pub terrain: Terrain,
    pub difficulty: u8,
    pub note: Option<String>,
}

/// Body for creating or updating an activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPayload {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub date: NaiveDate,
    pub distance: f64,
    pub duration: f64,
    pub location_id: i64,
}

impl ActivityPayload {
    /// Average speed the server will store, for showing while editing.
    ///
    /// The persisted value is computed server-side; this is a preview only.
    pub fn preview_avg_speed(&self) -> Option<f64> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        (positive(self.distance) && positive(self.duration))
            .then(|| average_speed(self.distance, self.duration))
    }
}

/// Client for the TrackBuddy API using reqwest.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `http://localhost:3000/api`).
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Execute a request and expect a JSON response.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(Self::error_from_response(resp).await);
        }
        Ok(resp.json::<T>().await?)
    }

    /// Execute a request with no expected response body.
    async fn execute_empty(&self, request: reqwest::RequestBuilder) -> Result<()> {
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(Self::error_from_response(resp).await);
        }
        Ok(())
    }

    /// Extract error information from a failed response.
    async fn error_from_response(resp: reqwest::Response) -> ClientError {
        let status = resp.status().as_u16();
        let text = resp.text().await.unwrap_or_default();
        let body: Option<ErrorBody> = serde_json::from_str(&text).ok();

        let (code, message, field) = match body {
            Some(body) => (body.error, body.message, body.field),
            None => (None, None, None),
        };

        ClientError::Api {
            status,
            code,
            message: message.unwrap_or_else(|| format!("Request failed: {}", status)),
            field,
        }
    }

    // ─── Locations ───────────────────────────────────────────────

    pub async fn get_locations(&self) -> Result<Vec<Location>> {
        self.execute_json(self.client.get(self.url("/locations")))
            .await
    }

    pub async fn get_location(&self, id: i64) -> Result<Location> {
        self.execute_json(self.client.get(self.url(&format!("/locations/{}", id))))
            .await
    }

    pub async fn create_location(&self, payload: &LocationPayload) -> Result<Location> {
        self.execute_json(self.client.post(self.url("/locations")).json(payload))
            .await
    }

    pub async fn update_location(&self, id: i64, payload: &LocationPayload) -> Result<Location> {
        self.execute_json(
            self.client
                .put(self.url(&format!("/locations/{}", id)))
                .json(payload),
        )
        .await
    }

    pub async fn delete_location(&self, id: i64) -> Result<()> {
        self.execute_empty(self.client.delete(self.url(&format!("/locations/{}", id))))
            .await
    }

    pub async fn get_location_activities(&self, id: i64) -> Result<Vec<Activity>> {
        self.execute_json(
            self.client
                .get(self.url(&format!("/locations/{}/activities", id))),
        )
        .await
    }

    // ─── Activities ──────────────────────────────────────────────

    /// GET `path` with `filter` encoded as query parameters.
    fn filtered_get(&self, path: &str, filter: &ActivityFilter) -> reqwest::RequestBuilder {
        self.client.get(self.url(path)).query(filter)
    }

    pub async fn get_activities(&self, filter: &ActivityFilter) -> Result<Vec<Activity>> {
        self.execute_json(self.filtered_get("/activities", filter))
            .await
    }

    /// Fetch activities on behalf of `ticket`.
    ///
    /// Returns `None` when a newer request was issued on the ticket's slot
    /// while this one was in flight; the outcome, error or not, is dropped.
    pub async fn get_activities_latest(
        &self,
        filter: &ActivityFilter,
        ticket: &Generation,
    ) -> Option<Result<Vec<Activity>>> {
        let result = self.get_activities(filter).await;
        ticket.settle(result)
    }

    pub async fn get_activity_summary(&self, filter: &ActivityFilter) -> Result<ActivitySummary> {
        self.execute_json(self.filtered_get("/activities/summary", filter))
            .await
    }

    pub async fn get_activity(&self, id: i64) -> Result<Activity> {
        self.execute_json(self.client.get(self.url(&format!("/activities/{}", id))))
            .await
    }

    pub async fn create_activity(&self, payload: &ActivityPayload) -> Result<Activity> {
        self.execute_json(self.client.post(self.url("/activities")).json(payload))
            .await
    }

    pub async fn update_activity(&self, id: i64, payload: &ActivityPayload) -> Result<Activity> {
        self.execute_json(
            self.client
                .put(self.url(&format!("/activities/{}", id)))
                .json(payload),
        )
        .await
    }

    pub async fn delete_activity(&self, id: i64) -> Result<()> {
        self.execute_empty(self.client.delete(self.url(&format!("/activities/{}", id))))
            .await
    }
}
