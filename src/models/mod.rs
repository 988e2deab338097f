//! Timetabling domain models.
//!
//! Core data types for lecture timetabling and exam seat allocation.
//! Inputs (courses, rooms, lecturers) are external, keyed by stable string
//! codes, and treated as read-only; outputs (sessions, exam assignments)
//! are produced by the engines in `crate::scheduler`.

mod course;
mod exam;
mod lecturer;
mod room;
mod session;

pub use course::{Course, CourseType};
pub use exam::{
    ColumnAssignment, ExamAssignment, ExamOutcome, ManualAssignment, RoomAllocation, UnusedColumn,
};
pub use lecturer::Lecturer;
pub use room::{DimensionParseError, Room, RoomDimensions, RoomType};
pub use session::{LectureOutcome, SchedulingIssue, Session};
