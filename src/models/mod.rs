// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod location;

pub use activity::{Activity, ActivityFilter, ActivityType, NewActivity};
pub use location::{Location, NewLocation, Terrain};
