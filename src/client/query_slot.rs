// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stale-response suppression for repeated queries.
//!
//! A view that re-fetches when its filters change owns one [`QuerySlot`].
//! Every fetch takes a [`Generation`] ticket first and settles its result
//! through it; results whose ticket has been superseded are dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// One logical query (for example "the activity list").
#[derive(Debug, Clone, Default)]
pub struct QuerySlot {
    latest: Arc<AtomicU64>,
}

/// Ticket for a single issued request.
#[derive(Debug, Clone)]
pub struct Generation {
    value: u64,
    latest: Arc<AtomicU64>,
}

impl QuerySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a ticket for a new request, superseding every earlier one.
    pub fn issue(&self) -> Generation {
        let value = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        Generation {
            value,
            latest: Arc::clone(&self.latest),
        }
    }
}

impl Generation {
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Whether no newer request has been issued on the slot.
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.value
    }

    /// Hand back `result` only if this ticket is still current.
    pub fn settle<T>(&self, result: T) -> Option<T> {
        if self.is_current() {
            Some(result)
        } else {
            tracing::debug!(generation = self.value(), "Dropping stale response");
            None
        }
    }
}
