use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use super::aggregate::{aggregate, OverallSummary, SemesterSummary};
use super::domain::{CourseGradeRecord, StudentInfo};
use super::error::{GradeError, RecordRejection};
use super::graded::GradedCourse;
use super::ranking::rank;
use super::validator::validate;
use crate::config::GradingConfig;

/// Semester summaries in chronological order, serialized as a `"YYYY-T"` map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SemesterSummaries(pub Vec<SemesterSummary>);

impl SemesterSummaries {
    pub fn get(&self, key: &str) -> Option<&SemesterSummary> {
        self.0.iter().find(|summary| summary.semester_key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SemesterSummary> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SemesterSummaries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.0
                .iter()
                .map(|summary| (summary.semester_key.as_str(), summary)),
        )
    }
}

/// Issued transcript. Built fresh per request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    pub student: StudentInfo,
    pub courses: Vec<GradedCourse>,
    pub semester_summaries: SemesterSummaries,
    pub overall_summary: OverallSummary,
    pub issued_at: NaiveDateTime,
    pub certificate_number: String,
}

/// Runs validation, classification, aggregation and ranking for one student.
#[derive(Debug, Clone)]
pub struct TranscriptAssembler {
    config: GradingConfig,
}

impl TranscriptAssembler {
    pub fn new(config: GradingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GradingConfig {
        &self.config
    }

    /// Assembles a transcript stamped with the current local time.
    pub fn assemble(
        &self,
        student: &StudentInfo,
        records: Vec<CourseGradeRecord>,
        cohort_gpas: Option<&[Decimal]>,
    ) -> Result<Transcript, GradeError> {
        self.assemble_at(student, records, cohort_gpas, Local::now().naive_local())
    }

    /// All-or-nothing: any hard rejection aborts the whole transcript.
    pub fn assemble_at(
        &self,
        student: &StudentInfo,
        records: Vec<CourseGradeRecord>,
        cohort_gpas: Option<&[Decimal]>,
        issued_at: NaiveDateTime,
    ) -> Result<Transcript, GradeError> {
        let courses = self.grade_courses(student, records)?;
        let aggregation = aggregate(&courses, self.config.required_credits)?;

        let mut overall = aggregation.overall;
        let standing =
            cohort_gpas.and_then(|cohort| rank(overall.cumulative_gpa, cohort));
        overall.apply_standing(standing);

        Ok(Transcript {
            certificate_number: self.certificate_number(student, issued_at),
            student: student.clone(),
            courses,
            semester_summaries: SemesterSummaries(aggregation.semesters),
            overall_summary: overall,
            issued_at,
        })
    }

    /// Validates and classifies every record, ordered by year, term and
    /// course code.
    pub fn grade_courses(
        &self,
        student: &StudentInfo,
        records: Vec<CourseGradeRecord>,
    ) -> Result<Vec<GradedCourse>, GradeError> {
        let mut courses = records
            .into_iter()
            .map(|record| {
                let validated = validate(record)?;
                if validated.student_id != student.student_id {
                    return Err(RecordRejection::StudentMismatch {
                        course_code: validated.course.course_code.clone(),
                        expected: student.student_id.clone(),
                        found: validated.student_id,
                    });
                }
                Ok(GradedCourse::from_validated(validated))
            })
            .collect::<Result<Vec<_>, RecordRejection>>()?;

        courses.sort_by(|left, right| {
            left.semester()
                .cmp(&right.semester())
                .then_with(|| left.course.course_code.cmp(&right.course.course_code))
        });

        Ok(courses)
    }

    /// `{prefix}-{student code}-{yyyyMMddHHmmssSSS}`; the student id stands in
    /// for a blank code.
    pub fn certificate_number(&self, student: &StudentInfo, issued_at: NaiveDateTime) -> String {
        let code = student.student_code.trim();
        let holder = if code.is_empty() {
            student.student_id.0.as_str()
        } else {
            code
        };
        format!(
            "{}-{}-{}",
            self.config.certificate_prefix,
            holder,
            issued_at.format("%Y%m%d%H%M%S%3f")
        )
    }
}
