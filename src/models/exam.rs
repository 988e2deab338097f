//! Exam schedule (solution) model.
//!
//! An exam assignment pins a course to one (day, slot) and accumulates
//! per-room allocations as capacity is consumed: which columns of which
//! room seat which students of which class, and which proctors cover each
//! room. Whatever the engine cannot seat is deferred to humans through the
//! manual-assignment log; leftover column capacity is reported separately
//! so it can be reclaimed by hand.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Columns claimed by one room allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnAssignment {
    /// Explicit column indices within the room's grid.
    Columns(BTreeSet<u32>),
    /// Overflow seating; column layout is arranged manually.
    Manual,
}

/// Seats claimed in one room for one class of a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomAllocation {
    /// Room code.
    pub room: String,
    /// Columns used, or `Manual` for overflow rooms.
    pub columns: ColumnAssignment,
    /// Class whose students fill these seats.
    pub class_code: String,
    /// Students seated, in fill order.
    pub student_ids: Vec<String>,
}

/// A course's exam sitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamAssignment {
    /// Course code.
    pub course: String,
    /// Exam date.
    pub day: String,
    /// Exam slot label.
    pub slot: String,
    /// Room allocations, in the order capacity was claimed.
    pub rooms: Vec<RoomAllocation>,
    /// Proctors covering each room.
    pub proctors: BTreeMap<String, BTreeSet<String>>,
}

/// Enrollment the engine could not place automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualAssignment {
    /// Course code.
    pub course: String,
    /// Students left unseated.
    pub unassigned_count: u32,
    /// Why automatic seating stopped.
    pub reason: String,
}

/// A column left unclaimed after partitioning a room among courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnusedColumn {
    /// Exam date.
    pub day: String,
    /// Exam slot label.
    pub slot: String,
    /// Room code.
    pub room: String,
    /// Column index within the room's grid.
    pub column: u32,
    /// Seats in the column.
    pub rows: u32,
}

/// A complete exam schedule with its intervention logs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamOutcome {
    /// Scheduled exams.
    pub exams: Vec<ExamAssignment>,
    /// Enrollment deferred to manual scheduling.
    pub manual_log: Vec<ManualAssignment>,
    /// Leftover column capacity available for manual reuse.
    pub unused_columns: Vec<UnusedColumn>,
}

impl ExamAssignment {
    /// Total students seated across all room allocations.
    pub fn seated_count(&self) -> u32 {
        self.rooms.iter().map(|r| r.student_ids.len() as u32).sum()
    }
}

impl ExamOutcome {
    /// Creates an empty outcome.
    pub fn new() -> Self {
        Self::default()
    }

    /// The exam assignment for a course, if scheduled.
    pub fn exam_for_course(&self, course: &str) -> Option<&ExamAssignment> {
        self.exams.iter().find(|e| e.course == course)
    }

    /// Students seated for a course (0 if not scheduled).
    pub fn seated_count(&self, course: &str) -> u32 {
        self.exam_for_course(course)
            .map(ExamAssignment::seated_count)
            .unwrap_or(0)
    }

    /// Students a course still needs seated manually (0 if fully placed).
    pub fn unassigned_count(&self, course: &str) -> u32 {
        self.manual_log
            .iter()
            .filter(|m| m.course == course)
            .map(|m| m.unassigned_count)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_outcome() -> ExamOutcome {
        let mut out = ExamOutcome::new();
        out.exams.push(ExamAssignment {
            course: "CSC201".into(),
            day: "2026-01-12".into(),
            slot: "09:00 - 11:00".into(),
            rooms: vec![
                RoomAllocation {
                    room: "LT-1".into(),
                    columns: ColumnAssignment::Columns([0, 1, 2].into()),
                    class_code: "CS-2".into(),
                    student_ids: (0..120).map(|i| format!("s{i}")).collect(),
                },
                RoomAllocation {
                    room: "OVF-1".into(),
                    columns: ColumnAssignment::Manual,
                    class_code: "CS-2".into(),
                    student_ids: (120..140).map(|i| format!("s{i}")).collect(),
                },
            ],
            proctors: BTreeMap::from([("LT-1".into(), BTreeSet::from(["dr.ade".to_string()]))]),
        });
        out.manual_log.push(ManualAssignment {
            course: "CSC201".into(),
            unassigned_count: 10,
            reason: "not enough space in all rooms including overflow".into(),
        });
        out
    }

    #[test]
    fn test_seated_and_unassigned_counts() {
        let out = sample_outcome();
        assert_eq!(out.seated_count("CSC201"), 140);
        assert_eq!(out.unassigned_count("CSC201"), 10);
        assert_eq!(out.seated_count("MTH101"), 0);
        assert_eq!(out.unassigned_count("MTH101"), 0);
    }

    #[test]
    fn test_exam_lookup() {
        let out = sample_outcome();
        let exam = out.exam_for_course("CSC201").unwrap();
        assert_eq!(exam.rooms.len(), 2);
        assert_eq!(exam.rooms[1].columns, ColumnAssignment::Manual);
        assert!(out.exam_for_course("MTH101").is_none());
    }
}
