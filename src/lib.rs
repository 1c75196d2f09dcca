// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! TrackBuddy: a small personal tracker for runs and rides.
//!
//! This crate provides the REST backend over a SQLite store, the derived
//! metrics shared by server and client, and a typed API client with CSV
//! export.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Db;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
}
