//! Semester and cumulative roll-ups.
//!
//! Each semester keeps a [`CreditLedger`] of raw sums (credit-weighted points,
//! attempted and earned credits, percentage totals). Semester figures divide
//! their own ledger once; the cumulative summary merges the ledgers and
//! divides once more, so cumulative GPA is always the credit-weighted mean of
//! every eligible record and never an average of semester GPAs.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::classifier::GradeBucket;
use super::domain::SemesterKey;
use super::error::GradeError;
use super::graded::GradedCourse;
use super::precision::ratio_or_zero;
use super::ranking::CohortStanding;

/// Letter-bucket counts for GPA-eligible courses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GradeDistribution {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub d: u32,
    pub f: u32,
}

impl GradeDistribution {
    fn count(&mut self, bucket: GradeBucket) {
        let slot = match bucket {
            GradeBucket::A => &mut self.a,
            GradeBucket::B => &mut self.b,
            GradeBucket::C => &mut self.c,
            GradeBucket::D => &mut self.d,
            GradeBucket::F => &mut self.f,
        };
        *slot += 1;
    }

    fn merge(&mut self, other: &Self) {
        self.a += other.a;
        self.b += other.b;
        self.c += other.c;
        self.d += other.d;
        self.f += other.f;
    }

    pub fn total(&self) -> u32 {
        self.a + self.b + self.c + self.d + self.f
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SemesterSummary {
    pub semester_key: String,
    pub year: i32,
    pub term: u8,
    pub course_count: usize,
    pub earned_credits: u32,
    pub attempted_credits: u32,
    pub semester_gpa: Decimal,
    pub average_percentage: Decimal,
    pub grade_distribution: GradeDistribution,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverallSummary {
    pub total_courses: usize,
    pub total_earned_credits: u32,
    pub total_attempted_credits: u32,
    pub cumulative_gpa: Decimal,
    pub average_percentage: Decimal,
    pub completion_rate: Decimal,
    pub required_credits: u32,
    pub remaining_credits: u32,
    pub grade_distribution: GradeDistribution,
    pub rank: Option<u32>,
    pub total_students: Option<u32>,
    pub rank_percentile: Option<Decimal>,
}

impl OverallSummary {
    /// Missing standing stays `None` so "no peer data" never reads as rank 1.
    pub fn apply_standing(&mut self, standing: Option<CohortStanding>) {
        self.rank = standing.map(|s| s.rank);
        self.total_students = standing.map(|s| s.total_students);
        self.rank_percentile = standing.map(|s| s.percentile);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub semesters: Vec<SemesterSummary>,
    pub overall: OverallSummary,
}

/// Raw, unrounded sums for one partition of courses.
#[derive(Debug, Clone, Default)]
struct CreditLedger {
    course_count: usize,
    attempted_credits: u32,
    earned_credits: u32,
    weighted_points: Decimal,
    percentage_total: Decimal,
    scored_courses: u32,
    distribution: GradeDistribution,
}

impl CreditLedger {
    fn record(&mut self, course: &GradedCourse) -> Result<(), GradeError> {
        self.course_count += 1;

        if !course.included_in_gpa {
            return Ok(());
        }

        let credits = u32::try_from(course.credits).map_err(|_| {
            GradeError::GpaCalculation(format!(
                "course {} carries negative credits ({})",
                course.course.course_code, course.credits
            ))
        })?;

        self.attempted_credits = checked_credits(self.attempted_credits, credits)?;
        if course.earns_credit() {
            self.earned_credits = checked_credits(self.earned_credits, credits)?;
        }

        let weighted = course
            .grade_point
            .checked_mul(Decimal::from(credits))
            .and_then(|points| self.weighted_points.checked_add(points))
            .ok_or_else(|| overflow("weighted grade points"))?;
        self.weighted_points = weighted;

        if let Some(percentage) = course.percentage_raw() {
            self.percentage_total = self
                .percentage_total
                .checked_add(percentage)
                .ok_or_else(|| overflow("percentage total"))?;
            self.scored_courses += 1;
        }

        if let Some(bucket) = course.letter_grade.bucket() {
            self.distribution.count(bucket);
        }

        Ok(())
    }

    fn merge(&mut self, other: &Self) -> Result<(), GradeError> {
        self.course_count += other.course_count;
        self.attempted_credits = checked_credits(self.attempted_credits, other.attempted_credits)?;
        self.earned_credits = checked_credits(self.earned_credits, other.earned_credits)?;
        self.weighted_points = self
            .weighted_points
            .checked_add(other.weighted_points)
            .ok_or_else(|| overflow("weighted grade points"))?;
        self.percentage_total = self
            .percentage_total
            .checked_add(other.percentage_total)
            .ok_or_else(|| overflow("percentage total"))?;
        self.scored_courses += other.scored_courses;
        self.distribution.merge(&other.distribution);
        Ok(())
    }

    fn gpa(&self) -> Decimal {
        ratio_or_zero(self.weighted_points, Decimal::from(self.attempted_credits))
    }

    fn average_percentage(&self) -> Decimal {
        ratio_or_zero(self.percentage_total, Decimal::from(self.scored_courses))
    }

    fn completion_rate(&self) -> Decimal {
        ratio_or_zero(
            Decimal::from(self.earned_credits) * Decimal::ONE_HUNDRED,
            Decimal::from(self.attempted_credits),
        )
    }
}

fn checked_credits(current: u32, added: u32) -> Result<u32, GradeError> {
    current
        .checked_add(added)
        .ok_or_else(|| overflow("credit total"))
}

fn overflow(what: &str) -> GradeError {
    GradeError::GpaCalculation(format!("{what} overflowed"))
}

/// Folds graded courses into chronological semester summaries plus one
/// cumulative summary. An empty input yields zeroed, fully defined figures.
pub fn aggregate(
    courses: &[GradedCourse],
    required_credits: u32,
) -> Result<Aggregation, GradeError> {
    let mut ledgers: BTreeMap<SemesterKey, CreditLedger> = BTreeMap::new();
    for course in courses {
        ledgers.entry(course.semester()).or_default().record(course)?;
    }

    let mut cumulative = CreditLedger::default();
    let mut semesters = Vec::with_capacity(ledgers.len());

    for (key, ledger) in &ledgers {
        cumulative.merge(ledger)?;
        semesters.push(SemesterSummary {
            semester_key: key.to_string(),
            year: key.year,
            term: key.term.number(),
            course_count: ledger.course_count,
            earned_credits: ledger.earned_credits,
            attempted_credits: ledger.attempted_credits,
            semester_gpa: ledger.gpa(),
            average_percentage: ledger.average_percentage(),
            grade_distribution: ledger.distribution,
        });
    }

    let overall = OverallSummary {
        total_courses: cumulative.course_count,
        total_earned_credits: cumulative.earned_credits,
        total_attempted_credits: cumulative.attempted_credits,
        cumulative_gpa: cumulative.gpa(),
        average_percentage: cumulative.average_percentage(),
        completion_rate: cumulative.completion_rate(),
        required_credits,
        remaining_credits: required_credits.saturating_sub(cumulative.earned_credits),
        grade_distribution: cumulative.distribution,
        rank: None,
        total_students: None,
        rank_percentile: None,
    };

    Ok(Aggregation {
        semesters,
        overall,
    })
}
