//! Transcript engine: classification, validation, aggregation, ranking and
//! assembly of one student's academic record, plus its service seams.
//!
//! Data flows one way: raw records are validated, classified per course,
//! folded into semester and cumulative summaries, ranked against the cohort
//! and finally packaged into an immutable [`Transcript`].

pub mod aggregate;
pub mod assembler;
pub mod classifier;
pub mod domain;
pub mod error;
pub mod graded;
pub mod import;
pub(crate) mod precision;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod service;
pub mod validator;

#[cfg(test)]
mod tests;

pub use aggregate::{aggregate, Aggregation, GradeDistribution, OverallSummary, SemesterSummary};
pub use assembler::{SemesterSummaries, Transcript, TranscriptAssembler};
pub use classifier::{classify, Classification, GradeBucket, LetterGrade};
pub use domain::{
    CourseGradeRecord, CourseRef, CourseStatus, ScoreSheet, SemesterKey, StudentId, StudentInfo,
    Term,
};
pub use error::{GradeError, RecordRejection};
pub use graded::{grade_record, GradedCourse};
pub use import::{CourseRecordImporter, RecordImportError};
pub use precision::round_half_up;
pub use ranking::{rank, CohortStanding};
pub use repository::{RepositoryError, TranscriptRepository};
pub use router::transcript_router;
pub use service::{TranscriptService, TranscriptServiceError};
pub use validator::{validate, ValidatedRecord};
