use rust_decimal::Decimal;

use super::domain::{CourseGradeRecord, StudentId, StudentInfo};

/// Read-only persistence seam the transcript service pulls its inputs from.
pub trait TranscriptRepository: Send + Sync {
    fn student(&self, id: &StudentId) -> Result<Option<StudentInfo>, RepositoryError>;
    fn course_records(&self, id: &StudentId) -> Result<Vec<CourseGradeRecord>, RepositoryError>;
    /// Cumulative GPAs of every student in the grade level, the subject included.
    fn cohort_gpas(&self, grade_level: u8) -> Result<Vec<Decimal>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
