//! Lecture schedule (solution) model.
//!
//! A lecture outcome is the committed set of weekly sessions plus the log
//! of placements the engine could not make. Unschedulable blocks are never
//! silently dropped; the caller decides whether an incomplete timetable is
//! acceptable.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One scheduled lecture occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Course code.
    pub course: String,
    /// Class (student group) attending.
    pub class_code: String,
    /// Weekday.
    pub day: String,
    /// Contiguous slot labels forming the teaching block.
    pub slots: Vec<String>,
    /// Assigned room code.
    pub room: String,
    /// Assigned lecturer, if the course has any mapped.
    pub lecturer: Option<String>,
    /// Class enrollment for this course; drives bump priority.
    pub enrollment: u32,
}

/// A placement the engine failed to make for one class/block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingIssue {
    /// Class the block was intended for.
    pub class_code: String,
    /// Block size (number of contiguous slots).
    pub block: usize,
    /// Why the placement failed.
    pub reason: String,
}

/// A complete lecture timetable with its issue log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LectureOutcome {
    /// Committed sessions.
    pub sessions: Vec<Session>,
    /// Failed placements, grouped by course.
    pub issues: HashMap<String, Vec<SchedulingIssue>>,
}

impl LectureOutcome {
    /// Creates an empty outcome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Total number of logged issues across all courses.
    pub fn issue_count(&self) -> usize {
        self.issues.values().map(Vec::len).sum()
    }

    /// All sessions for a course.
    pub fn sessions_for_course(&self, course: &str) -> Vec<&Session> {
        self.sessions.iter().filter(|s| s.course == course).collect()
    }

    /// All sessions held in a room.
    pub fn sessions_for_room(&self, room: &str) -> Vec<&Session> {
        self.sessions.iter().filter(|s| s.room == room).collect()
    }

    /// Whether no placement issues were logged. Issues recorded before a
    /// successful retry are kept, so a fully placed timetable can still
    /// report a non-empty log; inspect the reasons to tell them apart.
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_outcome() -> LectureOutcome {
        let mut out = LectureOutcome::new();
        out.sessions.push(Session {
            course: "CSC201".into(),
            class_code: "CS-2".into(),
            day: "Monday".into(),
            slots: vec!["08:00 - 08:55".into(), "09:00 - 09:55".into()],
            room: "LT-1".into(),
            lecturer: Some("dr.ade".into()),
            enrollment: 120,
        });
        out.sessions.push(Session {
            course: "CSC201".into(),
            class_code: "CS-2".into(),
            day: "Wednesday".into(),
            slots: vec!["10:00 - 10:55".into()],
            room: "CR-4".into(),
            lecturer: Some("dr.ade".into()),
            enrollment: 120,
        });
        out
    }

    #[test]
    fn test_outcome_queries() {
        let out = sample_outcome();
        assert_eq!(out.session_count(), 2);
        assert_eq!(out.sessions_for_course("CSC201").len(), 2);
        assert_eq!(out.sessions_for_room("LT-1").len(), 1);
        assert!(out.is_complete());
        assert_eq!(out.issue_count(), 0);
    }

    #[test]
    fn test_outcome_serde_round_trip() {
        let mut out = sample_outcome();
        out.issues.entry("MTH101".into()).or_default().push(SchedulingIssue {
            class_code: "CS-1".into(),
            block: 1,
            reason: "no feasible day/slot/room combination (will retry)".into(),
        });

        let json = serde_json::to_string(&out).unwrap();
        let back: LectureOutcome = serde_json::from_str(&json).unwrap();

        assert_eq!(back.session_count(), 2);
        assert_eq!(back.issue_count(), 1);
        assert_eq!(back.sessions[0].course, "CSC201");
        assert_eq!(back.sessions[0].slots, out.sessions[0].slots);
        assert_eq!(back.sessions[0].lecturer.as_deref(), Some("dr.ade"));
        assert_eq!(back.issues["MTH101"], out.issues["MTH101"]);
    }

    #[test]
    fn test_issue_count() {
        let mut out = sample_outcome();
        out.issues.entry("MTH101".into()).or_default().push(SchedulingIssue {
            class_code: "CS-1".into(),
            block: 2,
            reason: "no feasible day/slot/room combination (will retry)".into(),
        });
        assert_eq!(out.issue_count(), 1);
        assert!(!out.is_complete());
    }
}
