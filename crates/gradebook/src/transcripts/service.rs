use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};

use super::assembler::{Transcript, TranscriptAssembler};
use super::domain::{StudentId, StudentInfo};
use super::error::GradeError;
use super::graded::GradedCourse;
use super::repository::{RepositoryError, TranscriptRepository};
use crate::config::GradingConfig;

/// Service composing the repository with the transcript engine.
pub struct TranscriptService<R> {
    repository: Arc<R>,
    assembler: Arc<TranscriptAssembler>,
}

impl<R> TranscriptService<R>
where
    R: TranscriptRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: GradingConfig) -> Self {
        Self {
            repository,
            assembler: Arc::new(TranscriptAssembler::new(config)),
        }
    }

    pub fn assembler(&self) -> &TranscriptAssembler {
        &self.assembler
    }

    /// Generates a fresh transcript for one student.
    pub fn generate(&self, student_id: &StudentId) -> Result<Transcript, TranscriptServiceError> {
        let started = Instant::now();
        info!(student_id = %student_id, "generating transcript");

        let result = self.build(student_id);
        match &result {
            Ok(transcript) => info!(
                student_id = %student_id,
                courses = transcript.courses.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                certificate_number = %transcript.certificate_number,
                "transcript issued"
            ),
            Err(err) if err.is_internal() => {
                error!(student_id = %student_id, error = ?err, "transcript generation failed")
            }
            Err(err) => warn!(student_id = %student_id, error = %err, "transcript refused"),
        }

        result
    }

    /// Graded view of a single course on the student's record.
    pub fn course_grade(
        &self,
        student_id: &StudentId,
        course_id: &str,
    ) -> Result<GradedCourse, TranscriptServiceError> {
        let student = self.student(student_id)?;
        let records = self.repository.course_records(student_id)?;
        let matching = records
            .into_iter()
            .filter(|record| {
                record
                    .course
                    .as_ref()
                    .is_some_and(|course| course.course_id == course_id)
            })
            .collect();

        self.assembler
            .grade_courses(&student, matching)?
            .into_iter()
            .next()
            .ok_or_else(|| GradeError::LectureNotFound(course_id.to_string()).into())
    }

    fn build(&self, student_id: &StudentId) -> Result<Transcript, TranscriptServiceError> {
        let student = self.student(student_id)?;
        let records = self.repository.course_records(student_id)?;
        let cohort = match student.grade_level {
            Some(level) => Some(self.repository.cohort_gpas(level)?),
            None => None,
        };

        let transcript = self
            .assembler
            .assemble(&student, records, cohort.as_deref())?;
        Ok(transcript)
    }

    fn student(&self, student_id: &StudentId) -> Result<StudentInfo, TranscriptServiceError> {
        let student = self
            .repository
            .student(student_id)?
            .ok_or_else(|| GradeError::StudentNotFound(student_id.clone()))?;
        Ok(student.with_derived_fields_now())
    }
}

/// Error raised by the transcript service.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptServiceError {
    #[error(transparent)]
    Grade(#[from] GradeError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl TranscriptServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Grade(GradeError::StudentNotFound(_))
                | Self::Grade(GradeError::LectureNotFound(_))
                | Self::Repository(RepositoryError::NotFound)
        )
    }

    /// Failures the caller cannot fix by changing its input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Grade(GradeError::GpaCalculation(_))
                | Self::Repository(RepositoryError::Unavailable(_))
        )
    }
}
