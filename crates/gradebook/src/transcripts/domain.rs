use std::fmt;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for enrolled students.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StudentId(pub String);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Course-offering reference carried by every grade record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRef {
    pub course_id: String,
    pub course_code: String,
    pub title: String,
    #[serde(default)]
    pub professor_name: Option<String>,
}

/// Academic term within a year. Only the two regular terms exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Term {
    First,
    Second,
}

impl Term {
    pub const fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }
}

impl TryFrom<u8> for Term {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            other => Err(format!("term must be 1 or 2, found {other}")),
        }
    }
}

impl From<Term> for u8 {
    fn from(term: Term) -> Self {
        term.number()
    }
}

/// Ordering key for a semester: year first, then term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SemesterKey {
    pub year: i32,
    pub term: Term,
}

impl fmt::Display for SemesterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.term.number())
    }
}

/// Lifecycle of a single course result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseStatus {
    InProgress,
    Completed,
    NotGraded,
    Dropped,
    Failed,
}

impl CourseStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::NotGraded => "Not Graded",
            Self::Dropped => "Dropped",
            Self::Failed => "Failed",
        }
    }

    /// Final results with a score behind them. Everything else is provisional
    /// and stays out of GPA and credit accounting.
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub const fn remark(self) -> Option<&'static str> {
        match self {
            Self::InProgress => Some("in progress"),
            Self::NotGraded => Some("grade not yet entered"),
            Self::Dropped => Some("dropped"),
            Self::Completed | Self::Failed => None,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().replace([' ', '-'], "_").as_str() {
            "IN_PROGRESS" => Some(Self::InProgress),
            "COMPLETED" => Some(Self::Completed),
            "NOT_GRADED" => Some(Self::NotGraded),
            "DROPPED" => Some(Self::Dropped),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Raw score inputs for one course result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreSheet {
    pub total_score: Option<Decimal>,
    pub max_score: Option<Decimal>,
    pub attendance_score: Decimal,
    pub attendance_max_score: Decimal,
    pub assignment_score: Decimal,
    pub assignment_max_score: Decimal,
    /// Supplied by the attendance workflow, 0..=100.
    pub attendance_rate: u8,
}

/// One student's result in one course offering, as handed over by persistence.
///
/// References are optional here because upstream rows can be incomplete; the
/// validator turns a missing reference into a hard rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseGradeRecord {
    pub course: Option<CourseRef>,
    pub student_id: Option<StudentId>,
    pub year: i32,
    pub term: u8,
    pub credits: i32,
    pub status: CourseStatus,
    #[serde(default)]
    pub scores: ScoreSheet,
}

/// Identity snapshot stamped onto a transcript at generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentInfo {
    pub student_id: StudentId,
    pub student_code: String,
    pub name: String,
    #[serde(default)]
    pub department_code: Option<String>,
    #[serde(default)]
    pub department_name: Option<String>,
    #[serde(default)]
    pub grade_level: Option<u8>,
    #[serde(default)]
    pub admission_year: Option<i32>,
}

impl StudentInfo {
    /// Fills in admission year and grade level when the caller left them out.
    ///
    /// Student codes start with the admission year (`202500106114` -> 2025);
    /// grade level counts years since admission and is clamped to 1..=4.
    pub fn with_derived_fields(mut self, current_year: i32) -> Self {
        if self.admission_year.is_none() {
            self.admission_year = admission_year_from_code(&self.student_code);
        }

        if self.grade_level.is_none() {
            self.grade_level = self
                .admission_year
                .map(|admitted| (current_year - admitted + 1).clamp(1, 4) as u8);
        }

        self
    }

    pub fn with_derived_fields_now(self) -> Self {
        let year = chrono::Local::now().year();
        self.with_derived_fields(year)
    }
}

fn admission_year_from_code(code: &str) -> Option<i32> {
    let prefix = code.trim().get(..4)?;
    if !prefix.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    prefix.parse().ok()
}
