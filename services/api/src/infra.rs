use gradebook::config::GradingConfig;
use gradebook::transcripts::{
    aggregate, CourseGradeRecord, RepositoryError, StudentId, StudentInfo, TranscriptAssembler,
    TranscriptRepository,
};
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Demo-grade repository. Cohort GPAs are recomputed from the stored records
/// on every lookup, so the cohort always reflects the current snapshot.
#[derive(Clone)]
pub(crate) struct InMemoryTranscriptRepository {
    students: Arc<RwLock<BTreeMap<StudentId, StudentInfo>>>,
    records: Arc<RwLock<BTreeMap<StudentId, Vec<CourseGradeRecord>>>>,
    assembler: Arc<TranscriptAssembler>,
}

impl InMemoryTranscriptRepository {
    pub(crate) fn new(config: GradingConfig) -> Self {
        Self {
            students: Arc::default(),
            records: Arc::default(),
            assembler: Arc::new(TranscriptAssembler::new(config)),
        }
    }

    pub(crate) fn enroll(&self, student: StudentInfo, records: Vec<CourseGradeRecord>) {
        let id = student.student_id.clone();
        self.students
            .write()
            .expect("repository lock poisoned")
            .insert(id.clone(), student);
        self.records
            .write()
            .expect("repository lock poisoned")
            .insert(id, records);
    }

    pub(crate) fn student_ids(&self) -> Vec<StudentId> {
        self.students
            .read()
            .expect("repository lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    fn cumulative_gpa(&self, student: &StudentInfo) -> Option<Decimal> {
        let records = self
            .records
            .read()
            .expect("repository lock poisoned")
            .get(&student.student_id)
            .cloned()
            .unwrap_or_default();

        let outcome = self
            .assembler
            .grade_courses(student, records)
            .and_then(|courses| aggregate(&courses, self.assembler.config().required_credits));

        match outcome {
            Ok(aggregation) => Some(aggregation.overall.cumulative_gpa),
            Err(err) => {
                warn!(student_id = %student.student_id, error = %err, "student left out of cohort");
                None
            }
        }
    }
}

impl TranscriptRepository for InMemoryTranscriptRepository {
    fn student(&self, id: &StudentId) -> Result<Option<StudentInfo>, RepositoryError> {
        let guard = self
            .students
            .read()
            .map_err(|_| RepositoryError::Unavailable("student store poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    fn course_records(&self, id: &StudentId) -> Result<Vec<CourseGradeRecord>, RepositoryError> {
        let guard = self
            .records
            .read()
            .map_err(|_| RepositoryError::Unavailable("record store poisoned".to_string()))?;
        Ok(guard.get(id).cloned().unwrap_or_default())
    }

    fn cohort_gpas(&self, grade_level: u8) -> Result<Vec<Decimal>, RepositoryError> {
        let members: Vec<StudentInfo> = self
            .students
            .read()
            .map_err(|_| RepositoryError::Unavailable("student store poisoned".to_string()))?
            .values()
            .cloned()
            .map(StudentInfo::with_derived_fields_now)
            .filter(|student| student.grade_level == Some(grade_level))
            .collect();

        Ok(members
            .iter()
            .filter_map(|student| self.cumulative_gpa(student))
            .collect())
    }
}

pub(crate) fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|err| format!("failed to parse '{raw}' as a decimal ({err})"))
}
