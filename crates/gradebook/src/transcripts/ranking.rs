use rust_decimal::Decimal;
use serde::Serialize;

use super::precision::ratio_or_zero;

/// Standing of one student inside a grade-level cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CohortStanding {
    pub rank: u32,
    pub total_students: u32,
    /// `rank * 100 / total_students`; lower is better.
    pub percentile: Decimal,
}

/// Standard competition ranking by descending GPA.
///
/// Ties share the best rank and the next distinct GPA skips the tied count, so
/// `[4.0, 4.0, 3.0]` ranks `1, 1, 3`. Returns `None` when the cohort is empty
/// or does not contain `gpa`.
pub fn rank(gpa: Decimal, cohort: &[Decimal]) -> Option<CohortStanding> {
    if !cohort.contains(&gpa) {
        return None;
    }

    let total = u32::try_from(cohort.len()).ok()?;
    let ahead = cohort.iter().filter(|other| **other > gpa).count();
    let rank = u32::try_from(ahead).ok()? + 1;

    Some(CohortStanding {
        rank,
        total_students: total,
        percentile: ratio_or_zero(
            Decimal::from(rank) * Decimal::ONE_HUNDRED,
            Decimal::from(total),
        ),
    })
}
