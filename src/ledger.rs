//! Booking ledger: per-resource, per-day occupancy tracking.
//!
//! The ledger is the single source of truth for occupancy during one
//! scheduling run. Each resource kind (rooms, lecturers, classes, proctors)
//! gets its own ledger instance, and a ledger is never shared across runs.
//!
//! Slots are stored as label sets, so `assign` is idempotent and
//! `assign` followed by `unassign` of the same triple restores prior
//! availability exactly. `unassign` exists only to support conflict-driven
//! bumping: every release must be paired with a re-assign (successful bump)
//! or a revert (failed bump) before the operation returns.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Occupied slot labels per (resource, day).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingLedger {
    bookings: HashMap<String, HashMap<String, HashSet<String>>>,
}

impl BookingLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether none of `slots` are booked for `resource` on `day`.
    pub fn is_available(&self, resource: &str, day: &str, slots: &[String]) -> bool {
        match self.bookings.get(resource).and_then(|days| days.get(day)) {
            None => true,
            Some(booked) => slots.iter().all(|s| !booked.contains(s)),
        }
    }

    /// Books all `slots` for `resource` on `day`.
    pub fn assign(&mut self, resource: &str, day: &str, slots: &[String]) {
        let booked = self
            .bookings
            .entry(resource.to_string())
            .or_default()
            .entry(day.to_string())
            .or_default();
        booked.extend(slots.iter().cloned());
    }

    /// Releases `slots` for `resource` on `day`.
    pub fn unassign(&mut self, resource: &str, day: &str, slots: &[String]) {
        if let Some(booked) = self
            .bookings
            .get_mut(resource)
            .and_then(|days| days.get_mut(day))
        {
            for slot in slots {
                booked.remove(slot);
            }
        }
    }

    /// Number of slots booked for `resource` on `day`.
    pub fn booked_count(&self, resource: &str, day: &str) -> usize {
        self.bookings
            .get(resource)
            .and_then(|days| days.get(day))
            .map_or(0, HashSet::len)
    }
}
