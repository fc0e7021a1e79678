use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use super::domain::{CourseGradeRecord, CourseRef, CourseStatus, ScoreSheet, StudentId};

#[derive(Debug)]
pub enum RecordImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: u64, message: String },
}

impl std::fmt::Display for RecordImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordImportError::Io(err) => write!(f, "failed to read enrollment export: {}", err),
            RecordImportError::Csv(err) => write!(f, "invalid enrollment CSV data: {}", err),
            RecordImportError::InvalidRow { line, message } => {
                write!(f, "invalid enrollment row at line {}: {}", line, message)
            }
        }
    }
}

impl std::error::Error for RecordImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecordImportError::Io(err) => Some(err),
            RecordImportError::Csv(err) => Some(err),
            RecordImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for RecordImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RecordImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads course results from an enrollment CSV export, one row per result.
///
/// Rows are converted as-is; missing references stay `None` so the validator
/// can reject them with a proper reason.
pub struct CourseRecordImporter;

impl CourseRecordImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CourseGradeRecord>, RecordImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<CourseGradeRecord>, RecordImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut records = Vec::new();

        for raw in csv_reader.records() {
            let raw = raw?;
            let line = raw.position().map(|position| position.line()).unwrap_or_default();
            let row: EnrollmentRow = raw.deserialize(Some(&headers))?;
            records.push(row.into_record(line)?);
        }

        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
struct EnrollmentRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    student_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    course_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    course_code: Option<String>,
    #[serde(default)]
    course_title: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    professor: Option<String>,
    year: i32,
    term: u8,
    credits: i32,
    status: String,
    total_score: Option<Decimal>,
    max_score: Option<Decimal>,
    attendance_score: Option<Decimal>,
    attendance_max_score: Option<Decimal>,
    assignment_score: Option<Decimal>,
    assignment_max_score: Option<Decimal>,
    attendance_rate: Option<u8>,
}

impl EnrollmentRow {
    fn into_record(self, line: u64) -> Result<CourseGradeRecord, RecordImportError> {
        let status = CourseStatus::parse(&self.status).ok_or_else(|| {
            RecordImportError::InvalidRow {
                line,
                message: format!("unknown course status `{}`", self.status),
            }
        })?;

        let course = match (self.course_id, self.course_code) {
            (Some(course_id), Some(course_code)) => Some(CourseRef {
                title: if self.course_title.is_empty() {
                    course_code.clone()
                } else {
                    self.course_title
                },
                course_id,
                course_code,
                professor_name: self.professor,
            }),
            _ => None,
        };

        Ok(CourseGradeRecord {
            course,
            student_id: self.student_id.map(StudentId),
            year: self.year,
            term: self.term,
            credits: self.credits,
            status,
            scores: ScoreSheet {
                total_score: self.total_score,
                max_score: self.max_score,
                attendance_score: self.attendance_score.unwrap_or_default(),
                attendance_max_score: self.attendance_max_score.unwrap_or_default(),
                assignment_score: self.assignment_score.unwrap_or_default(),
                assignment_max_score: self.assignment_max_score.unwrap_or_default(),
                attendance_rate: self.attendance_rate.unwrap_or_default(),
            },
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
