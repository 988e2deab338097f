//! Lecturer model.
//!
//! A lecturer's weekly availability is declared per day as the set of slot
//! labels they can teach. A day with no entry means the lecturer is fully
//! available that day; the absence of restrictions is the common case.
//! Lecturers double as the exam proctor pool, with optional per-date
//! proctoring availability.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A lecturer (and potential exam proctor).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lecturer {
    /// Unique lecturer identifier.
    pub id: String,
    /// Teaching availability: day → slot labels the lecturer can take.
    /// A missing day means fully available.
    pub availability: HashMap<String, HashSet<String>>,
    /// Dates the lecturer can proctor. `None` means any date.
    pub proctor_dates: Option<HashSet<String>>,
}

impl Lecturer {
    /// Creates a fully available lecturer.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            availability: HashMap::new(),
            proctor_dates: None,
        }
    }

    /// Restricts availability on a day to the given slots.
    pub fn with_day_availability(
        mut self,
        day: impl Into<String>,
        slots: impl IntoIterator<Item = String>,
    ) -> Self {
        self.availability.insert(day.into(), slots.into_iter().collect());
        self
    }

    /// Restricts proctoring to the given dates.
    pub fn with_proctor_dates(mut self, dates: impl IntoIterator<Item = String>) -> Self {
        self.proctor_dates = Some(dates.into_iter().collect());
        self
    }

    /// Whether the lecturer's declared availability covers all of `slots`
    /// on `day`. A day without an entry counts as fully available.
    pub fn covers(&self, day: &str, slots: &[String]) -> bool {
        match self.availability.get(day) {
            None => true,
            Some(available) => slots.iter().all(|s| available.contains(s)),
        }
    }

    /// Whether the lecturer can proctor on a date.
    pub fn can_proctor_on(&self, date: &str) -> bool {
        match &self.proctor_dates {
            None => true,
            Some(dates) => dates.contains(date),
        }
    }
}
