use rust_decimal::Decimal;
use serde::Serialize;

use super::classifier::{classify, LetterGrade};
use super::domain::{CourseGradeRecord, CourseRef, CourseStatus, ScoreSheet, SemesterKey};
use super::error::RecordRejection;
use super::precision::round_half_up;
use super::validator::{validate, ValidatedRecord};

/// Course line as it appears on a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradedCourse {
    #[serde(flatten)]
    pub course: CourseRef,
    pub year: i32,
    pub term: u8,
    pub credits: i32,
    pub status: CourseStatus,
    pub status_label: &'static str,
    #[serde(flatten)]
    pub scores: ScoreSheet,
    /// Display value, rounded half-up to two places.
    pub percentage: Option<Decimal>,
    pub letter_grade: LetterGrade,
    pub grade_point: Decimal,
    pub included_in_gpa: bool,
    pub remarks: Option<&'static str>,
    #[serde(skip)]
    pub(crate) semester: SemesterKey,
    #[serde(skip)]
    pub(crate) raw_percentage: Option<Decimal>,
}

impl GradedCourse {
    /// Classifies a validated record. The letter comes from the unrounded
    /// percentage; only the displayed percentage is rounded.
    pub fn from_validated(record: ValidatedRecord) -> Self {
        let classification = classify(record.percentage);

        Self {
            year: record.semester.year,
            term: record.semester.term.number(),
            semester: record.semester,
            credits: record.credits,
            status: record.status,
            status_label: record.status.label(),
            percentage: record.percentage.map(round_half_up),
            raw_percentage: record.percentage,
            letter_grade: classification.letter,
            grade_point: classification.grade_point,
            included_in_gpa: record.included_in_gpa,
            remarks: record.status.remark(),
            course: record.course,
            scores: record.scores,
        }
    }

    pub fn semester(&self) -> SemesterKey {
        self.semester
    }

    /// Unrounded percentage, used by averages so they round only once.
    pub fn percentage_raw(&self) -> Option<Decimal> {
        self.raw_percentage
    }

    /// Credits toward graduation: completed with a passing letter.
    pub fn earns_credit(&self) -> bool {
        self.status == CourseStatus::Completed && !self.letter_grade.is_failing()
    }
}

/// Validates and classifies a single record.
pub fn grade_record(record: CourseGradeRecord) -> Result<GradedCourse, RecordRejection> {
    validate(record).map(GradedCourse::from_validated)
}
