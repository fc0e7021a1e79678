use rust_decimal::Decimal;

use super::classifier::classify;
use super::domain::{
    CourseGradeRecord, CourseRef, CourseStatus, ScoreSheet, SemesterKey, StudentId, Term,
};
use super::error::RecordRejection;

/// Record that passed structural checks, with its raw percentage resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecord {
    pub course: CourseRef,
    pub student_id: StudentId,
    pub semester: SemesterKey,
    pub credits: i32,
    pub status: CourseStatus,
    pub scores: ScoreSheet,
    /// Unrounded `total / max * 100`; only final results carry one.
    pub percentage: Option<Decimal>,
    pub included_in_gpa: bool,
}

/// Structural gate in front of classification and aggregation.
///
/// Missing references, impossible terms and unusable scores on final results
/// are hard rejections. Provisional statuses (in progress, not graded,
/// dropped) pass but are excluded from GPA and credit accounting.
pub fn validate(record: CourseGradeRecord) -> Result<ValidatedRecord, RecordRejection> {
    let CourseGradeRecord {
        course,
        student_id,
        year,
        term,
        credits,
        status,
        scores,
    } = record;

    let course = course.ok_or(RecordRejection::MissingCourse)?;
    let student_id = student_id.ok_or_else(|| RecordRejection::MissingStudent {
        course_code: course.course_code.clone(),
    })?;
    let term = Term::try_from(term).map_err(|_| RecordRejection::InvalidTerm {
        course_code: course.course_code.clone(),
        term,
    })?;

    if scores.attendance_rate > 100 {
        return Err(RecordRejection::AttendanceRateOutOfRange {
            course_code: course.course_code.clone(),
            rate: scores.attendance_rate,
        });
    }

    let percentage = if status.is_final() {
        Some(final_percentage(&course, status, &scores)?)
    } else {
        None
    };

    Ok(ValidatedRecord {
        course,
        student_id,
        semester: SemesterKey { year, term },
        credits,
        status,
        scores,
        percentage,
        included_in_gpa: status.is_final(),
    })
}

fn final_percentage(
    course: &CourseRef,
    status: CourseStatus,
    scores: &ScoreSheet,
) -> Result<Decimal, RecordRejection> {
    let (total, max) = match (scores.total_score, scores.max_score) {
        (Some(total), Some(max)) => (total, max),
        _ => {
            return Err(RecordRejection::MissingScore {
                course_code: course.course_code.clone(),
                status,
            })
        }
    };

    if max <= Decimal::ZERO {
        return Err(RecordRejection::InvalidMaxScore {
            course_code: course.course_code.clone(),
            max_score: max,
        });
    }

    let percentage = total
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(max))
        .ok_or_else(|| RecordRejection::ScoreOutOfRange {
            course_code: course.course_code.clone(),
            total_score: total,
            max_score: max,
        })?;
    if percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
        return Err(RecordRejection::PercentageOutOfRange {
            course_code: course.course_code.clone(),
            percentage,
        });
    }

    if status == CourseStatus::Failed && !classify(Some(percentage)).letter.is_failing() {
        return Err(RecordRejection::FailedWithPassingScore {
            course_code: course.course_code.clone(),
            percentage,
        });
    }

    Ok(percentage)
}
