//! Room model.
//!
//! Rooms serve both engines: lectures care about type and capacity, exams
//! additionally need a rows × columns seating grid, a cap on how many
//! courses may share the room in one slot, and a proctor headcount.
//!
//! # Dimensions
//! Exam seating is column-based, so the grid is parsed up front from a
//! `"rows x cols"` string. A string that does not parse corrupts all
//! column arithmetic, so parsing failures abort validation rather than
//! surfacing mid-run.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A teaching or examination room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room code (e.g., "LT-1").
    pub code: String,
    /// Seat count for lecture capacity checks.
    pub capacity: u32,
    /// Room classification.
    pub room_type: RoomType,
    /// Laboratory subtypes this room supports (labs only).
    pub lab_subtypes: Vec<String>,
    /// Seating grid for exam column packing.
    pub dimensions: Option<RoomDimensions>,
    /// Maximum distinct courses that may share this room in one exam slot.
    pub max_courses: u32,
    /// Proctors required per exam sitting.
    pub proctors_required: u32,
    /// Whether this room is reserved for exam overflow.
    pub overflow: bool,
}

/// Room type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomType {
    /// Large tiered hall; the only type eligible for large classes.
    LectureHall,
    /// Ordinary flat classroom.
    Classroom,
    /// Hands-on laboratory; excluded from ordinary exam seating.
    Laboratory,
    /// Multi-purpose auditorium.
    Auditorium,
}

/// A rows × columns seating grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDimensions {
    /// Seats per column.
    pub rows: u32,
    /// Number of columns.
    pub columns: u32,
}

/// Failure to parse a `"rows x cols"` dimension string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed room dimensions '{input}': expected 'rows x cols' with two positive integers")]
pub struct DimensionParseError {
    /// The offending input string.
    pub input: String,
}

impl RoomDimensions {
    /// Creates a grid.
    pub fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    /// Total seats in the grid.
    #[inline]
    pub fn seat_count(&self) -> u32 {
        self.rows * self.columns
    }
}

impl FromStr for RoomDimensions {
    type Err = DimensionParseError;

    /// Parses `"43 x 7"` (separator `x` or `X`, surrounding whitespace ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || DimensionParseError {
            input: s.to_string(),
        };
        let mut parts = s.splitn(2, ['x', 'X']);
        let rows: u32 = parts
            .next()
            .and_then(|p| p.trim().parse().ok())
            .ok_or_else(err)?;
        let columns: u32 = parts
            .next()
            .and_then(|p| p.trim().parse().ok())
            .ok_or_else(err)?;
        if rows == 0 || columns == 0 {
            return Err(err());
        }
        Ok(Self { rows, columns })
    }
}

impl Room {
    /// Creates a room of the given type.
    pub fn new(code: impl Into<String>, room_type: RoomType, capacity: u32) -> Self {
        Self {
            code: code.into(),
            capacity,
            room_type,
            lab_subtypes: Vec::new(),
            dimensions: None,
            max_courses: 1,
            proctors_required: 0,
            overflow: false,
        }
    }

    /// Creates a lecture hall.
    pub fn lecture_hall(code: impl Into<String>, capacity: u32) -> Self {
        Self::new(code, RoomType::LectureHall, capacity)
    }

    /// Creates a classroom.
    pub fn classroom(code: impl Into<String>, capacity: u32) -> Self {
        Self::new(code, RoomType::Classroom, capacity)
    }

    /// Creates a laboratory supporting the given subtypes.
    pub fn laboratory(code: impl Into<String>, capacity: u32, subtypes: Vec<String>) -> Self {
        let mut room = Self::new(code, RoomType::Laboratory, capacity);
        room.lab_subtypes = subtypes;
        room
    }

    /// Sets the seating grid.
    pub fn with_dimensions(mut self, rows: u32, columns: u32) -> Self {
        self.dimensions = Some(RoomDimensions::new(rows, columns));
        self
    }

    /// Parses and sets the seating grid from a `"rows x cols"` string.
    pub fn with_dimensions_str(mut self, s: &str) -> Result<Self, DimensionParseError> {
        self.dimensions = Some(s.parse()?);
        Ok(self)
    }

    /// Sets the per-slot course sharing limit.
    pub fn with_max_courses(mut self, max_courses: u32) -> Self {
        self.max_courses = max_courses;
        self
    }

    /// Sets the required proctor headcount.
    pub fn with_proctors_required(mut self, proctors: u32) -> Self {
        self.proctors_required = proctors;
        self
    }

    /// Marks this room as exam overflow.
    pub fn as_overflow(mut self) -> Self {
        self.overflow = true;
        self
    }

    /// Whether this lab room supports a given subtype.
    pub fn supports_lab_subtype(&self, subtype: &str) -> bool {
        self.lab_subtypes.iter().any(|s| s == subtype)
    }

    /// Whether this room may host ordinary (non-lab) lectures.
    pub fn hosts_lectures(&self) -> bool {
        matches!(
            self.room_type,
            RoomType::LectureHall | RoomType::Classroom | RoomType::Auditorium
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_parse() {
        let d: RoomDimensions = "43 x 7".parse().unwrap();
        assert_eq!(d.rows, 43);
        assert_eq!(d.columns, 7);
        assert_eq!(d.seat_count(), 301);

        let d2: RoomDimensions = "10X4".parse().unwrap();
        assert_eq!(d2, RoomDimensions::new(10, 4));
    }

    #[test]
    fn test_dimensions_parse_failures() {
        for bad in ["", "43", "a x b", "43 x", "0 x 7", "43 x 0", "3 - 4"] {
            assert!(bad.parse::<RoomDimensions>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_room_builder() {
        let r = Room::lecture_hall("LT-1", 400)
            .with_dimensions(43, 7)
            .with_max_courses(2)
            .with_proctors_required(3);
        assert_eq!(r.room_type, RoomType::LectureHall);
        assert_eq!(r.dimensions.unwrap().seat_count(), 301);
        assert_eq!(r.max_courses, 2);
        assert!(!r.overflow);
        assert!(r.hosts_lectures());
    }

    #[test]
    fn test_lab_subtype_support() {
        let r = Room::laboratory("Lab-3", 60, vec!["computing".into(), "networks".into()]);
        assert!(r.supports_lab_subtype("computing"));
        assert!(!r.supports_lab_subtype("chemistry"));
        assert!(!r.hosts_lectures());
    }

    #[test]
    fn test_overflow_flag() {
        let r = Room::classroom("CR-9", 80).as_overflow();
        assert!(r.overflow);
    }
}
