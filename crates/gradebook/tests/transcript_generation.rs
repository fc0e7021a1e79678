use chrono::NaiveDate;
use gradebook::config::GradingConfig;
use gradebook::transcripts::{
    CourseRecordImporter, GradeError, LetterGrade, RecordRejection, StudentId, StudentInfo,
    TranscriptAssembler,
};
use rust_decimal_macros::dec;
use std::io::Cursor;

const EXPORT: &str = "\
student_id,course_id,course_code,course_title,professor,year,term,credits,status,total_score,max_score,attendance_score,attendance_max_score,assignment_score,assignment_max_score,attendance_rate
stu-5,lec-11,CS101,Programming Fundamentals,Dr. Kim,2024,1,3,COMPLETED,190,200,19,20,38,40,100
stu-5,lec-12,MATH101,Calculus I,Dr. Han,2024,1,3,FAILED,55,100,8,10,12,20,70
stu-5,lec-21,CS102,Data Structures,Dr. Kim,2024,2,3,COMPLETED,84.5,100,10,10,17,20,95
stu-5,lec-22,PHY101,General Physics,,2024,2,3,NOT_GRADED,,,,,,,90
stu-5,lec-31,CS201,Algorithms,Dr. Seo,2025,1,3,IN_PROGRESS,,,,,,,100
";

fn student() -> StudentInfo {
    StudentInfo {
        student_id: StudentId("stu-5".to_string()),
        student_code: "202400100005".to_string(),
        name: "Eunbi Jang".to_string(),
        department_code: Some("CSE".to_string()),
        department_name: Some("Computer Science & Engineering".to_string()),
        grade_level: None,
        admission_year: None,
    }
    .with_derived_fields(2025)
}

fn issued_at() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 30)
        .and_then(|date| date.and_hms_milli_opt(17, 45, 3, 250))
        .expect("valid issue time")
}

#[test]
fn export_becomes_a_complete_transcript() {
    let records = CourseRecordImporter::from_reader(Cursor::new(EXPORT)).expect("export parses");
    let assembler = TranscriptAssembler::new(GradingConfig::default());
    let cohort = [dec!(3.90), dec!(2.67), dec!(2.67), dec!(2.10)];

    let transcript = assembler
        .assemble_at(&student(), records, Some(&cohort[..]), issued_at())
        .expect("transcript assembles");

    assert_eq!(transcript.student.grade_level, Some(2));
    assert_eq!(
        transcript.certificate_number,
        "TR-202400100005-20250630174503250"
    );

    let letters: Vec<LetterGrade> = transcript
        .courses
        .iter()
        .map(|course| course.letter_grade)
        .collect();
    assert_eq!(
        letters,
        vec![
            LetterGrade::APlus,
            LetterGrade::F,
            LetterGrade::BZero,
            LetterGrade::NotApplicable,
            LetterGrade::NotApplicable,
        ]
    );

    let keys: Vec<&str> = transcript
        .semester_summaries
        .iter()
        .map(|summary| summary.semester_key.as_str())
        .collect();
    assert_eq!(keys, vec!["2024-1", "2024-2", "2025-1"]);
    let spring = transcript
        .semester_summaries
        .get("2024-1")
        .expect("first semester present");
    assert_eq!(spring.semester_gpa, dec!(2.25));

    let overall = &transcript.overall_summary;
    assert_eq!(overall.total_courses, 5);
    assert_eq!(overall.total_attempted_credits, 9);
    assert_eq!(overall.total_earned_credits, 6);
    assert_eq!(overall.cumulative_gpa, dec!(2.50));
    assert_eq!(overall.completion_rate, dec!(66.67));
    assert_eq!(overall.average_percentage, dec!(78.17));
    assert_eq!(overall.remaining_credits, 134);
    assert_eq!(overall.rank, None);
}

#[test]
fn cohort_standing_uses_competition_ranking() {
    let records = CourseRecordImporter::from_reader(Cursor::new(EXPORT)).expect("export parses");
    let assembler = TranscriptAssembler::new(GradingConfig::default());
    let cohort = [dec!(3.90), dec!(2.50), dec!(2.50), dec!(2.10)];

    let transcript = assembler
        .assemble_at(&student(), records, Some(&cohort[..]), issued_at())
        .expect("transcript assembles");

    let overall = &transcript.overall_summary;
    assert_eq!(overall.rank, Some(2));
    assert_eq!(overall.total_students, Some(4));
    assert_eq!(overall.rank_percentile, Some(dec!(50.00)));
}

#[test]
fn one_bad_row_aborts_the_transcript() {
    let broken = EXPORT.replace(
        "stu-5,lec-21,CS102,Data Structures,Dr. Kim,2024,2,3,COMPLETED,84.5,100",
        "stu-5,lec-21,CS102,Data Structures,Dr. Kim,2024,2,3,COMPLETED,84.5,0",
    );
    let records = CourseRecordImporter::from_reader(Cursor::new(broken)).expect("export parses");
    let assembler = TranscriptAssembler::new(GradingConfig::default());

    match assembler.assemble_at(&student(), records, None, issued_at()) {
        Err(GradeError::Structural(RecordRejection::InvalidMaxScore { course_code, .. })) => {
            assert_eq!(course_code, "CS102");
        }
        other => panic!("expected invalid max score, got {other:?}"),
    }
}
