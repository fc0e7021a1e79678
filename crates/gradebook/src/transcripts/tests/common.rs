use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::config::GradingConfig;
use crate::transcripts::domain::{
    CourseGradeRecord, CourseRef, CourseStatus, ScoreSheet, StudentId, StudentInfo,
};
use crate::transcripts::graded::{grade_record, GradedCourse};
use crate::transcripts::repository::{RepositoryError, TranscriptRepository};
use crate::transcripts::TranscriptService;

pub(super) const STUDENT: &str = "stu-1";

pub(super) fn student_info() -> StudentInfo {
    StudentInfo {
        student_id: StudentId(STUDENT.to_string()),
        student_code: "202400106114".to_string(),
        name: "Seoyeon Choi".to_string(),
        department_code: Some("CSE".to_string()),
        department_name: Some("Computer Science & Engineering".to_string()),
        grade_level: Some(2),
        admission_year: Some(2024),
    }
}

pub(super) fn record(
    code: &str,
    year: i32,
    term: u8,
    credits: i32,
    status: CourseStatus,
    total: Option<Decimal>,
) -> CourseGradeRecord {
    CourseGradeRecord {
        course: Some(CourseRef {
            course_id: format!("lec-{}", code.to_ascii_lowercase()),
            course_code: code.to_string(),
            title: format!("{code} lecture"),
            professor_name: None,
        }),
        student_id: Some(StudentId(STUDENT.to_string())),
        year,
        term,
        credits,
        status,
        scores: ScoreSheet {
            total_score: total,
            max_score: total.map(|_| Decimal::ONE_HUNDRED),
            attendance_rate: 100,
            ..ScoreSheet::default()
        },
    }
}

pub(super) fn completed(
    code: &str,
    year: i32,
    term: u8,
    credits: i32,
    total: Decimal,
) -> CourseGradeRecord {
    record(code, year, term, credits, CourseStatus::Completed, Some(total))
}

pub(super) fn graded(records: Vec<CourseGradeRecord>) -> Vec<GradedCourse> {
    records
        .into_iter()
        .map(|record| grade_record(record).expect("record grades"))
        .collect()
}

/// Two semesters of mixed results used across the service and routing tests.
pub(super) fn transcript_records() -> Vec<CourseGradeRecord> {
    use rust_decimal_macros::dec;

    vec![
        completed("CS201", 2024, 2, 3, dec!(88)),
        completed("CS101", 2024, 1, 3, dec!(96)),
        record("MATH101", 2024, 1, 3, CourseStatus::Failed, Some(dec!(48))),
        completed("ENG101", 2024, 1, 2, dec!(72.5)),
        record("CS202", 2024, 2, 3, CourseStatus::NotGraded, None),
        record("HIS101", 2024, 2, 2, CourseStatus::Dropped, None),
    ]
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) students: Arc<Mutex<HashMap<StudentId, StudentInfo>>>,
    pub(super) records: Arc<Mutex<HashMap<StudentId, Vec<CourseGradeRecord>>>>,
    pub(super) cohorts: Arc<Mutex<HashMap<u8, Vec<Decimal>>>>,
}

impl MemoryRepository {
    pub(super) fn seeded() -> Self {
        use rust_decimal_macros::dec;

        let repository = Self::default();
        let info = student_info();
        repository
            .records
            .lock()
            .expect("repository mutex poisoned")
            .insert(info.student_id.clone(), transcript_records());
        repository
            .cohorts
            .lock()
            .expect("repository mutex poisoned")
            .insert(2, vec![dec!(4.10), dec!(2.55), dec!(2.55), dec!(1.90)]);
        repository
            .students
            .lock()
            .expect("repository mutex poisoned")
            .insert(info.student_id.clone(), info);
        repository
    }
}

impl TranscriptRepository for MemoryRepository {
    fn student(&self, id: &StudentId) -> Result<Option<StudentInfo>, RepositoryError> {
        let guard = self.students.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn course_records(&self, id: &StudentId) -> Result<Vec<CourseGradeRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned().unwrap_or_default())
    }

    fn cohort_gpas(&self, grade_level: u8) -> Result<Vec<Decimal>, RepositoryError> {
        let guard = self.cohorts.lock().expect("repository mutex poisoned");
        Ok(guard.get(&grade_level).cloned().unwrap_or_default())
    }
}

pub(super) struct UnavailableRepository;

impl TranscriptRepository for UnavailableRepository {
    fn student(&self, _id: &StudentId) -> Result<Option<StudentInfo>, RepositoryError> {
        Ok(Some(student_info()))
    }

    fn course_records(&self, _id: &StudentId) -> Result<Vec<CourseGradeRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn cohort_gpas(&self, _grade_level: u8) -> Result<Vec<Decimal>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (TranscriptService<MemoryRepository>, MemoryRepository) {
    let repository = MemoryRepository::seeded();
    let service = TranscriptService::new(Arc::new(repository.clone()), GradingConfig::default());
    (service, repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body to bytes");
    serde_json::from_slice(&bytes).expect("json body")
}
