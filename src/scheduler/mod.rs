//! Scheduling engines.
//!
//! Two structurally similar engines share the booking primitives in
//! [`crate::ledger`]:
//!
//! - [`LectureScheduler`]: priority-driven greedy assignment of weekly
//!   lecture sessions with conflict-driven bumping and bounded retry.
//! - [`ExamScheduler`]: column-packing seat allocation of exams with
//!   overflow rooms and two-tier proctor assignment.
//!
//! Both are single-threaded and operate on one mutable run state; all
//! randomized tiebreaks draw from an injected `Rng` so seeded runs are
//! reproducible.

mod exam;
mod lecture;

use std::collections::{BTreeMap, HashMap};

pub use exam::{ExamProblem, ExamScheduler};
pub use lecture::{LectureProblem, LectureScheduler};

/// Enrollment per course, broken down by class.
///
/// Student-id order is significant: it fixes the seat fill order for exam
/// packing. The class map is a `BTreeMap` so the "first class with
/// unassigned students" rule is deterministic across runs.
pub type EnrollmentBreakdown = HashMap<String, BTreeMap<String, Vec<String>>>;
