use crate::infra::{parse_decimal, InMemoryTranscriptRepository};
use clap::Args;
use gradebook::config::{AppConfig, GradingConfig};
use gradebook::error::AppError;
use gradebook::transcripts::{
    CourseGradeRecord, CourseRecordImporter, CourseRef, CourseStatus, ScoreSheet, StudentId,
    StudentInfo, Transcript, TranscriptAssembler, TranscriptService,
};
use gradebook::workflow::{validate_transition_with_reason, WorkflowStatus};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print transcripts as JSON instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct TranscriptArgs {
    /// Enrollment CSV export with one row per course result
    #[arg(long)]
    pub(crate) records: PathBuf,
    /// Student identifier the records must belong to
    #[arg(long)]
    pub(crate) student_id: String,
    /// Student name printed on the transcript
    #[arg(long)]
    pub(crate) name: String,
    /// Student code; its first four digits give the admission year
    #[arg(long, default_value = "")]
    pub(crate) student_code: String,
    /// Department name
    #[arg(long)]
    pub(crate) department: Option<String>,
    /// Admission year when the code does not carry one
    #[arg(long)]
    pub(crate) admission_year: Option<i32>,
    /// Grade level (1-4); derived from the admission year when omitted
    #[arg(long)]
    pub(crate) grade_level: Option<u8>,
    /// Cohort cumulative GPA, repeatable; enables rank and percentile
    #[arg(long = "cohort-gpa", value_parser = parse_decimal)]
    pub(crate) cohort_gpas: Vec<Decimal>,
    /// Print the transcript as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct StatusCheckArgs {
    /// Current workflow status (e.g. PENDING)
    #[arg(long)]
    pub(crate) current: String,
    /// Proposed next status
    #[arg(long)]
    pub(crate) next: String,
    /// Justification, required for REJECTED and CANCELLED
    #[arg(long)]
    pub(crate) reason: Option<String>,
}

pub(crate) fn run_transcript(args: TranscriptArgs) -> Result<(), AppError> {
    let TranscriptArgs {
        records,
        student_id,
        name,
        student_code,
        department,
        admission_year,
        grade_level,
        cohort_gpas,
        json,
    } = args;

    let grading = AppConfig::load()?.grading;
    let records = CourseRecordImporter::from_path(records)?;
    let student = StudentInfo {
        student_id: StudentId(student_id),
        student_code,
        name,
        department_code: None,
        department_name: department,
        grade_level,
        admission_year,
    }
    .with_derived_fields_now();

    let cohort = (!cohort_gpas.is_empty()).then_some(cohort_gpas.as_slice());
    let transcript = TranscriptAssembler::new(grading).assemble(&student, records, cohort)?;
    print_transcript(&transcript, json)
}

pub(crate) fn run_status_check(args: StatusCheckArgs) -> Result<(), AppError> {
    let transition =
        validate_transition_with_reason(&args.current, &args.next, args.reason.as_deref())?;

    println!(
        "{} -> {}: permitted",
        transition.current.label(),
        transition.next.label()
    );
    if transition.terminal {
        println!("  {} is terminal; no further changes are accepted", transition.next);
    }
    let onward: Vec<&str> = transition
        .next
        .allowed_next()
        .iter()
        .map(|status| status.code())
        .collect();
    if !onward.is_empty() {
        println!("  next permitted: {}", onward.join(", "));
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let grading = AppConfig::load()?.grading;
    let repository = Arc::new(seed_repository(grading.clone()));
    let service = TranscriptService::new(repository.clone(), grading);

    println!("Gradebook transcript demo");
    for student_id in repository.student_ids() {
        let transcript = service.generate(&student_id)?;
        print_transcript(&transcript, args.json)?;
    }

    println!("\nStatus guard");
    for status in WorkflowStatus::ordered() {
        let onward: Vec<&str> = status
            .allowed_next()
            .iter()
            .map(|next| next.code())
            .collect();
        let targets = if onward.is_empty() {
            "terminal".to_string()
        } else {
            onward.join(", ")
        };
        println!("- {} -> {}", status.code(), targets);
    }

    Ok(())
}

fn print_transcript(transcript: &Transcript, json: bool) -> Result<(), AppError> {
    if json {
        let rendered = serde_json::to_string_pretty(transcript)
            .map_err(|err| AppError::Io(err.into()))?;
        println!("{rendered}");
    } else {
        render_transcript(transcript);
    }
    Ok(())
}

pub(crate) fn render_transcript(transcript: &Transcript) {
    let student = &transcript.student;
    println!(
        "\nTranscript {} (issued {})",
        transcript.certificate_number,
        transcript.issued_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "{} | code {} | {} | year {}",
        student.name,
        if student.student_code.is_empty() {
            "-"
        } else {
            student.student_code.as_str()
        },
        student.department_name.as_deref().unwrap_or("undeclared"),
        student
            .grade_level
            .map(|level| level.to_string())
            .unwrap_or_else(|| "-".to_string())
    );

    for summary in transcript.semester_summaries.iter() {
        println!(
            "\n{}  GPA {} | {}/{} credits earned | avg {}%",
            summary.semester_key,
            summary.semester_gpa,
            summary.earned_credits,
            summary.attempted_credits,
            summary.average_percentage
        );
        for course in transcript
            .courses
            .iter()
            .filter(|course| course.year == summary.year && course.term == summary.term)
        {
            let percentage = course
                .percentage
                .map(|value| format!("{value}%"))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  - {:<8} {:<32} {:>2} cr  {:<4} {:>7}  {}",
                course.course.course_code,
                course.course.title,
                course.credits,
                course.letter_grade.label(),
                percentage,
                course.remarks.unwrap_or(course.status_label)
            );
        }
    }

    let overall = &transcript.overall_summary;
    let distribution = &overall.grade_distribution;
    println!(
        "\nCumulative GPA {} | {}/{} credits earned ({}% completion) | {} remaining of {}",
        overall.cumulative_gpa,
        overall.total_earned_credits,
        overall.total_attempted_credits,
        overall.completion_rate,
        overall.remaining_credits,
        overall.required_credits
    );
    println!(
        "Grades: A {} | B {} | C {} | D {} | F {}",
        distribution.a, distribution.b, distribution.c, distribution.d, distribution.f
    );
    match (overall.rank, overall.total_students, overall.rank_percentile) {
        (Some(rank), Some(total), Some(percentile)) => {
            println!("Cohort rank {rank} of {total} (top {percentile}%)")
        }
        _ => println!("Cohort rank unavailable"),
    }
}

struct SeedCourse {
    year: i32,
    term: u8,
    code: &'static str,
    title: &'static str,
    credits: i32,
    status: CourseStatus,
    /// Total score in hundredths out of 100.
    score: Option<i64>,
}

const fn seed(
    year: i32,
    term: u8,
    code: &'static str,
    title: &'static str,
    credits: i32,
    status: CourseStatus,
    score: Option<i64>,
) -> SeedCourse {
    SeedCourse {
        year,
        term,
        code,
        title,
        credits,
        status,
        score,
    }
}

const MINJI: [SeedCourse; 6] = [
    seed(2025, 1, "CS101", "Programming Fundamentals", 3, CourseStatus::Completed, Some(9620)),
    seed(2025, 1, "MATH101", "Calculus I", 3, CourseStatus::Completed, Some(8810)),
    seed(2025, 1, "ENG101", "Academic English", 2, CourseStatus::Completed, Some(9100)),
    seed(2025, 2, "CS102", "Data Structures", 3, CourseStatus::Completed, Some(9340)),
    seed(2025, 2, "MATH102", "Calculus II", 3, CourseStatus::Completed, Some(8450)),
    seed(2026, 1, "CS201", "Algorithms", 3, CourseStatus::InProgress, None),
];

const JAEWON: [SeedCourse; 6] = [
    seed(2025, 1, "CS101", "Programming Fundamentals", 3, CourseStatus::Completed, Some(7825)),
    seed(2025, 1, "MATH101", "Calculus I", 3, CourseStatus::Failed, Some(5230)),
    seed(2025, 1, "ENG101", "Academic English", 2, CourseStatus::Completed, Some(8100)),
    seed(2025, 2, "CS102", "Data Structures", 3, CourseStatus::Completed, Some(7140)),
    seed(2025, 2, "MATH101", "Calculus I", 3, CourseStatus::Completed, Some(6620)),
    seed(2025, 2, "HIS101", "Korean History", 2, CourseStatus::Dropped, None),
];

const SOOAH: [SeedCourse; 6] = [
    seed(2025, 1, "CS101", "Programming Fundamentals", 3, CourseStatus::Completed, Some(8500)),
    seed(2025, 1, "MATH101", "Calculus I", 3, CourseStatus::Completed, Some(9050)),
    seed(2025, 1, "ENG101", "Academic English", 2, CourseStatus::Completed, Some(7700)),
    seed(2025, 2, "CS102", "Data Structures", 3, CourseStatus::Completed, Some(8870)),
    seed(2025, 2, "MATH102", "Calculus II", 3, CourseStatus::Completed, Some(9490)),
    seed(2025, 2, "PHY101", "General Physics", 3, CourseStatus::NotGraded, None),
];

const HYUN: [SeedCourse; 6] = [
    seed(2025, 1, "CS101", "Programming Fundamentals", 3, CourseStatus::Completed, Some(6900)),
    seed(2025, 1, "MATH101", "Calculus I", 3, CourseStatus::Completed, Some(6150)),
    seed(2025, 1, "ENG101", "Academic English", 2, CourseStatus::Completed, Some(7480)),
    seed(2025, 2, "CS102", "Data Structures", 3, CourseStatus::Failed, Some(4410)),
    seed(2025, 2, "MATH102", "Calculus II", 3, CourseStatus::Completed, Some(6000)),
    seed(2026, 1, "CS102", "Data Structures", 3, CourseStatus::InProgress, None),
];

/// Four second-year students with a spread of outcomes, including failed,
/// retaken, ungraded and dropped courses.
pub(crate) fn seed_repository(config: GradingConfig) -> InMemoryTranscriptRepository {
    let repository = InMemoryTranscriptRepository::new(config);
    let cohort: [(&str, &str, &str, &[SeedCourse]); 4] = [
        ("stu-1001", "202500106114", "Minji Park", &MINJI),
        ("stu-1002", "202500106207", "Jae-won Kim", &JAEWON),
        ("stu-1003", "202500106315", "Soo-ah Lee", &SOOAH),
        ("stu-1004", "202500106422", "Hyun Choi", &HYUN),
    ];

    for (id, code, name, courses) in cohort {
        let student_id = StudentId(id.to_string());
        let records = courses
            .iter()
            .map(|course| seed_record(&student_id, course))
            .collect();

        repository.enroll(
            StudentInfo {
                student_id,
                student_code: code.to_string(),
                name: name.to_string(),
                department_code: Some("CSE".to_string()),
                department_name: Some("Computer Science & Engineering".to_string()),
                grade_level: Some(2),
                admission_year: None,
            },
            records,
        );
    }

    repository
}

fn seed_record(student_id: &StudentId, course: &SeedCourse) -> CourseGradeRecord {
    CourseGradeRecord {
        course: Some(CourseRef {
            course_id: format!(
                "{}-{}-{}",
                course.code.to_ascii_lowercase(),
                course.year,
                course.term
            ),
            course_code: course.code.to_string(),
            title: course.title.to_string(),
            professor_name: None,
        }),
        student_id: Some(student_id.clone()),
        year: course.year,
        term: course.term,
        credits: course.credits,
        status: course.status,
        scores: ScoreSheet {
            total_score: course.score.map(|hundredths| Decimal::new(hundredths, 2)),
            max_score: course.score.map(|_| Decimal::ONE_HUNDRED),
            attendance_rate: 100,
            ..ScoreSheet::default()
        },
    }
}
