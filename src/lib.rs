//! University timetabling and exam scheduling engine.
//!
//! Allocates finite, conflicting resources (rooms, time slots, lecturers,
//! proctors) to two related combinatorial problems:
//!
//! - **Lecture timetabling**: assigning each course-class session to a
//!   day, contiguous slot block, room, and lecturer without conflicts,
//!   via priority-driven greedy assignment with conflict-driven bumping
//!   and bounded retry.
//! - **Exam scheduling**: assigning each course's exam to a day/slot,
//!   packing enrolled students into room seating columns (with overflow
//!   rooms), and assigning proctors.
//!
//! The boundary is data-in/data-out: callers build plain problem
//! containers from whatever store they use, and the engines return
//! in-memory schedules plus issue logs. Persistence, presentation, and
//! transport live elsewhere. Neither engine guarantees optimality or a
//! complete schedule; everything it cannot place is reported, never
//! silently dropped.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Course`, `Room`, `Lecturer`,
//!   `Session`, `ExamAssignment`, and the outcome containers
//! - **`ledger`**: Per-resource, per-day slot occupancy tracking
//! - **`slots`**: Slot-label parsing, block decomposition, contiguous
//!   block enumeration
//! - **`scheduler`**: The `LectureScheduler` and `ExamScheduler` engines
//! - **`validation`**: Structural input checks run before scheduling
//!
//! # Reproducibility
//!
//! All randomized tiebreaks draw from a caller-supplied `rand::Rng`, so
//! seeding a `SmallRng` reproduces a run exactly.

pub mod ledger;
pub mod models;
pub mod scheduler;
pub mod slots;
pub mod validation;
