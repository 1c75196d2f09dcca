// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod validation;

pub use validation::{
    validate_activity, validate_activity_filter, validate_location, ActivityInput,
    ActivityQuery, LocationInput,
};
