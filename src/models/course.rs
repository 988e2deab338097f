//! Course model.
//!
//! A course is the unit of scheduling demand: its credit hours determine
//! how many contiguous-slot blocks the lecture scheduler must place per
//! week, and its type determines which rooms qualify (practicals need a
//! laboratory of the matching subtype).

use serde::{Deserialize, Serialize};

/// A course offered in the scheduling period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique course code (e.g., "CSC201").
    pub code: String,
    /// Weekly credit hours; drives block decomposition.
    pub credit_hours: u32,
    /// Course classification.
    pub course_type: CourseType,
    /// Required laboratory subtype for practicals (e.g., "computing").
    pub lab_subtype: Option<String>,
}

/// Course type classification.
///
/// Determines room compatibility for lectures and whether the exam
/// engine auto-schedules the course at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseType {
    /// Taught in lecture halls, classrooms, or auditoriums.
    Lecture,
    /// Taught in a laboratory; exams are arranged manually.
    Practical,
    /// Free-form label from an external catalog.
    Custom(String),
}

impl Course {
    /// Creates a lecture course.
    pub fn new(code: impl Into<String>, credit_hours: u32) -> Self {
        Self {
            code: code.into(),
            credit_hours,
            course_type: CourseType::Lecture,
            lab_subtype: None,
        }
    }

    /// Creates a practical course with a required lab subtype.
    pub fn practical(
        code: impl Into<String>,
        credit_hours: u32,
        lab_subtype: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            credit_hours,
            course_type: CourseType::Practical,
            lab_subtype: Some(lab_subtype.into()),
        }
    }

    /// Sets the course type.
    pub fn with_type(mut self, course_type: CourseType) -> Self {
        self.course_type = course_type;
        self
    }

    /// Sets the required lab subtype.
    pub fn with_lab_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.lab_subtype = Some(subtype.into());
        self
    }

    /// Whether this course is a hands-on lab/practical.
    ///
    /// Custom labels are matched case-insensitively on "lab"/"practical",
    /// which is how external catalogs tag these courses.
    pub fn is_lab_practical(&self) -> bool {
        self.course_type.is_lab_practical()
    }
}

impl CourseType {
    /// Whether this type denotes a lab/practical course.
    pub fn is_lab_practical(&self) -> bool {
        match self {
            CourseType::Lecture => false,
            CourseType::Practical => true,
            CourseType::Custom(label) => {
                let lower = label.to_lowercase();
                lower.contains("lab") || lower.contains("practical")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_builder() {
        let c = Course::new("CSC201", 3);
        assert_eq!(c.code, "CSC201");
        assert_eq!(c.credit_hours, 3);
        assert_eq!(c.course_type, CourseType::Lecture);
        assert!(c.lab_subtype.is_none());
    }

    #[test]
    fn test_practical_course() {
        let c = Course::practical("CSC202", 2, "computing");
        assert_eq!(c.course_type, CourseType::Practical);
        assert_eq!(c.lab_subtype.as_deref(), Some("computing"));
        assert!(c.is_lab_practical());
    }

    #[test]
    fn test_custom_type_lab_detection() {
        let c = Course::new("PHY101", 1).with_type(CourseType::Custom("Lab Practical".into()));
        assert!(c.is_lab_practical());

        let c2 = Course::new("PHY102", 2).with_type(CourseType::Custom("Seminar".into()));
        assert!(!c2.is_lab_practical());
    }
}
