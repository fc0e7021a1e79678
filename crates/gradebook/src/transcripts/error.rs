use rust_decimal::Decimal;

use super::domain::{CourseStatus, StudentId};

/// Failure of one transcript computation. Nothing partial is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum GradeError {
    #[error("invalid grade record: {0}")]
    Structural(#[from] RecordRejection),
    #[error("gpa calculation failed: {0}")]
    GpaCalculation(String),
    #[error("student {0} not found")]
    StudentNotFound(StudentId),
    #[error("lecture {0} not found")]
    LectureNotFound(String),
}

/// Hard rejection of a grade record. Distinct from soft GPA exclusion, which
/// keeps the record on the transcript.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordRejection {
    #[error("record is missing its course reference")]
    MissingCourse,
    #[error("record for course {course_code} is missing its student reference")]
    MissingStudent { course_code: String },
    #[error("course {course_code} has invalid term {term}; expected 1 or 2")]
    InvalidTerm { course_code: String, term: u8 },
    #[error("course {course_code} belongs to student {found}, not {expected}")]
    StudentMismatch {
        course_code: String,
        expected: StudentId,
        found: StudentId,
    },
    #[error("course {course_code} is {} but has no score", .status.label())]
    MissingScore {
        course_code: String,
        status: CourseStatus,
    },
    #[error("course {course_code} has non-positive maximum score {max_score}")]
    InvalidMaxScore {
        course_code: String,
        max_score: Decimal,
    },
    #[error("course {course_code} score {total_score}/{max_score} cannot be expressed as a percentage")]
    ScoreOutOfRange {
        course_code: String,
        total_score: Decimal,
        max_score: Decimal,
    },
    #[error("course {course_code} percentage {percentage} is outside 0..=100")]
    PercentageOutOfRange {
        course_code: String,
        percentage: Decimal,
    },
    #[error("course {course_code} is marked failed but scored {percentage}%")]
    FailedWithPassingScore {
        course_code: String,
        percentage: Decimal,
    },
    #[error("course {course_code} attendance rate {rate} is outside 0..=100")]
    AttendanceRateOutOfRange { course_code: String, rate: u8 },
}
