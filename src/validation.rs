//! Input validation for scheduling problems.
//!
//! Checks structural integrity of courses, rooms, lecturers, and the
//! slot/day universe before a run starts. Detects:
//! - Duplicate codes/ids
//! - Empty room/day/slot universes with work to place
//! - Malformed slot labels
//! - Zero-credit courses
//! - References to unknown courses or lecturers
//! - Exam rooms without a usable seating grid or course-sharing limit
//!
//! Per-course failures during scheduling are reported through the issue
//! logs, never here; validation only rejects input that would corrupt a
//! run (most importantly the column-geometry math of exam rooms).

use std::collections::HashSet;

use crate::models::RoomType;
use crate::scheduler::{ExamProblem, LectureProblem};
use crate::slots;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same code/id.
    DuplicateId,
    /// No rooms, days, or slots although there is work to place.
    EmptyUniverse,
    /// A slot label does not start with a parseable hour.
    MalformedSlotLabel,
    /// A course has zero credit hours.
    InvalidCreditHours,
    /// A mapping references an unknown course or lecturer.
    UnknownReference,
    /// An ordinary exam room has no parseable seating grid.
    MissingDimensions,
    /// An ordinary exam room allows zero concurrent courses.
    InvalidCourseLimit,
    /// A course's class breakdown does not add up to its enrollment.
    EnrollmentMismatch,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn check_unique<'a>(
    ids: impl Iterator<Item = &'a str>,
    entity: &str,
    errors: &mut Vec<ValidationError>,
) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {entity}: {id}"),
            ));
        }
    }
    seen
}

/// Validates a lecture scheduling problem.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_lecture_problem(problem: &LectureProblem) -> ValidationResult {
    let mut errors = Vec::new();

    let course_codes = check_unique(
        problem.courses.iter().map(|c| c.code.as_str()),
        "course code",
        &mut errors,
    );
    check_unique(
        problem.rooms.iter().map(|r| r.code.as_str()),
        "room code",
        &mut errors,
    );
    let lecturer_ids = check_unique(
        problem.lecturers.iter().map(|l| l.id.as_str()),
        "lecturer id",
        &mut errors,
    );

    if !problem.courses.is_empty()
        && (problem.rooms.is_empty() || problem.days.is_empty() || problem.time_slots.is_empty())
    {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyUniverse,
            "Courses present but no rooms, days, or time slots to place them in",
        ));
    }

    for slot in &problem.time_slots {
        if slots::start_hour(slot).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MalformedSlotLabel,
                format!("Slot label '{slot}' does not start with 'HH:MM'"),
            ));
        }
    }

    for course in &problem.courses {
        if course.credit_hours == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCreditHours,
                format!("Course '{}' has zero credit hours", course.code),
            ));
        }
    }

    for course in problem.course_classes.keys() {
        if !course_codes.contains(course.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownReference,
                format!("Class mapping references unknown course '{course}'"),
            ));
        }
    }
    for (course, lecturers) in &problem.course_lecturers {
        if !course_codes.contains(course.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownReference,
                format!("Lecturer mapping references unknown course '{course}'"),
            ));
        }
        for lecturer in lecturers {
            if !lecturer_ids.contains(lecturer.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownReference,
                    format!("Course '{course}' references unknown lecturer '{lecturer}'"),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates an exam scheduling problem.
///
/// Ordinary (non-overflow, non-laboratory) rooms must carry a seating
/// grid and a positive course-sharing limit: both feed the column
/// partition arithmetic and cannot be defaulted safely.
pub fn validate_exam_problem(problem: &ExamProblem) -> ValidationResult {
    let mut errors = Vec::new();

    check_unique(
        problem.rooms.iter().map(|r| r.code.as_str()),
        "room code",
        &mut errors,
    );
    check_unique(
        problem.proctors.iter().map(|p| p.id.as_str()),
        "proctor id",
        &mut errors,
    );

    if !problem.enrollments.is_empty()
        && (problem.rooms.is_empty()
            || problem.exam_days.is_empty()
            || problem.exam_slots.is_empty())
    {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyUniverse,
            "Exams to place but no rooms, days, or slots",
        ));
    }

    for room in &problem.rooms {
        if room.overflow || room.room_type == RoomType::Laboratory {
            continue;
        }
        if room.dimensions.is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingDimensions,
                format!("Exam room '{}' has no seating grid", room.code),
            ));
        }
        if room.max_courses == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCourseLimit,
                format!("Exam room '{}' allows zero concurrent courses", room.code),
            ));
        }
    }

    for (course, &total) in &problem.enrollments {
        let breakdown_total: u32 = problem
            .breakdown
            .get(course)
            .map(|classes| classes.values().map(|ids| ids.len() as u32).sum())
            .unwrap_or(0);
        if breakdown_total != total {
            errors.push(ValidationError::new(
                ValidationErrorKind::EnrollmentMismatch,
                format!(
                    "Course '{course}': enrollment {total} but breakdown lists {breakdown_total}"
                ),
            ));
        }
    }
    for course in problem.breakdown.keys() {
        if !problem.enrollments.contains_key(course) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownReference,
                format!("Breakdown references unknown course '{course}'"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, CourseType, Lecturer, Room};

    fn slots_of(hours: &[u32]) -> Vec<String> {
        hours
            .iter()
            .map(|h| format!("{h:02}:00 - {h:02}:55"))
            .collect()
    }

    fn valid_lecture_problem() -> LectureProblem {
        LectureProblem::new(
            vec![Room::classroom("CR-1", 60)],
            vec!["Monday".into()],
            slots_of(&[8, 9]),
        )
        .with_course(Course::new("CSC101", 2))
        .with_lecturer(Lecturer::new("dr.ade"))
        .with_course_lecturers("CSC101", vec!["dr.ade".into()])
        .with_class_enrollment("CSC101", "CS-1", vec!["s1".into(), "s2".into()])
    }

    #[test]
    fn test_valid_lecture_problem() {
        assert!(validate_lecture_problem(&valid_lecture_problem()).is_ok());
    }

    #[test]
    fn test_duplicate_course_code() {
        let problem = valid_lecture_problem().with_course(Course::new("CSC101", 2));
        let errors = validate_lecture_problem(&problem).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_empty_universe() {
        let problem = LectureProblem::new(vec![], vec![], vec![])
            .with_course(Course::new("CSC101", 2));
        let errors = validate_lecture_problem(&problem).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::EmptyUniverse));
    }

    #[test]
    fn test_malformed_slot_label() {
        let mut problem = valid_lecture_problem();
        problem.time_slots.push("first period".into());
        let errors = validate_lecture_problem(&problem).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::MalformedSlotLabel));
    }

    #[test]
    fn test_zero_credit_course() {
        let problem = valid_lecture_problem().with_course(Course::new("NUL000", 0));
        let errors = validate_lecture_problem(&problem).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidCreditHours));
    }

    #[test]
    fn test_unknown_lecturer_reference() {
        let problem =
            valid_lecture_problem().with_course_lecturers("CSC101", vec!["dr.nobody".into()]);
        let errors = validate_lecture_problem(&problem).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownReference));
    }

    #[test]
    fn test_unknown_course_in_class_map() {
        let problem = valid_lecture_problem().with_class_enrollment(
            "GHOST",
            "CS-1",
            vec!["s9".into()],
        );
        let errors = validate_lecture_problem(&problem).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownReference));
    }

    fn valid_exam_problem() -> ExamProblem {
        ExamProblem::new(
            vec![Room::lecture_hall("LT-1", 301)
                .with_dimensions(43, 7)
                .with_max_courses(1)],
            vec!["2026-01-12".into()],
            vec!["09:00 - 11:00".into()],
        )
        .with_course(
            "CSC201",
            CourseType::Lecture,
            vec![("CS-2".into(), vec!["s1".into(), "s2".into()])],
        )
    }

    #[test]
    fn test_valid_exam_problem() {
        assert!(validate_exam_problem(&valid_exam_problem()).is_ok());
    }

    #[test]
    fn test_exam_room_without_dimensions() {
        let mut problem = valid_exam_problem();
        problem.rooms.push(Room::classroom("CR-1", 50));
        let errors = validate_exam_problem(&problem).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::MissingDimensions));
    }

    #[test]
    fn test_overflow_room_needs_no_dimensions() {
        // Overflow rooms consume a capacity counter, not columns.
        let mut problem = valid_exam_problem();
        problem.rooms.push(Room::classroom("OVF-1", 50).as_overflow());
        assert!(validate_exam_problem(&problem).is_ok());
    }

    #[test]
    fn test_zero_max_courses_rejected() {
        let mut problem = valid_exam_problem();
        problem.rooms.push(
            Room::classroom("CR-1", 50)
                .with_dimensions(10, 5)
                .with_max_courses(0),
        );
        let errors = validate_exam_problem(&problem).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidCourseLimit));
    }

    #[test]
    fn test_enrollment_mismatch() {
        let mut problem = valid_exam_problem();
        problem.enrollments.insert("CSC201".into(), 99);
        let errors = validate_exam_problem(&problem).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::EnrollmentMismatch));
    }

    #[test]
    fn test_multiple_errors_accumulate() {
        let problem = LectureProblem::new(vec![], vec![], vec![])
            .with_course(Course::new("CSC101", 0))
            .with_course_lecturers("GHOST", vec![]);
        let errors = validate_lecture_problem(&problem).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
