// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Location model: a named place where activities happen.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Terrain of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    Road,
    Trail,
    Forest,
}

impl Terrain {
    pub const ALL: [Terrain; 3] = [Terrain::Road, Terrain::Trail, Terrain::Forest];

    pub fn as_str(self) -> &'static str {
        match self {
            Terrain::Road => "road",
            Terrain::Trail => "trail",
            Terrain::Forest => "forest",
        }
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Terrain {
    type Err = ();

    /// Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Terrain::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(())
    }
}

/// Stored location row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Location {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: i64,
    pub name: String,
    pub terrain: Terrain,
    pub difficulty: u8,
    pub note: Option<String>,
}

/// Validated location fields, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    /// Trimmed, non-empty
    pub name: String,
    pub terrain: Terrain,
    /// 1..=5
    pub difficulty: u8,
    pub note: Option<String>,
}
