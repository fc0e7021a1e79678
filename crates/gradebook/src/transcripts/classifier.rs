//! Percentage to letter grade mapping on the 4.5-point scale.
//!
//! | Percentage | Letter | Points |
//! |------------|--------|--------|
//! | >= 95      | A+     | 4.5    |
//! | >= 90      | A0     | 4.0    |
//! | >= 85      | B+     | 3.5    |
//! | >= 80      | B0     | 3.0    |
//! | >= 75      | C+     | 2.5    |
//! | >= 70      | C0     | 2.0    |
//! | >= 65      | D+     | 1.5    |
//! | >= 60      | D0     | 1.0    |
//! | < 60       | F      | 0.0    |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Closed letter-grade set. `NotApplicable` marks results without a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A0")]
    AZero,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B0")]
    BZero,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C0")]
    CZero,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "D0")]
    DZero,
    #[serde(rename = "F")]
    F,
    #[serde(rename = "N/A")]
    NotApplicable,
}

/// Lower bounds (inclusive), highest first. Anything below the last row is F.
const THRESHOLDS: [(i64, LetterGrade); 8] = [
    (95, LetterGrade::APlus),
    (90, LetterGrade::AZero),
    (85, LetterGrade::BPlus),
    (80, LetterGrade::BZero),
    (75, LetterGrade::CPlus),
    (70, LetterGrade::CZero),
    (65, LetterGrade::DPlus),
    (60, LetterGrade::DZero),
];

impl LetterGrade {
    pub const fn label(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::AZero => "A0",
            Self::BPlus => "B+",
            Self::BZero => "B0",
            Self::CPlus => "C+",
            Self::CZero => "C0",
            Self::DPlus => "D+",
            Self::DZero => "D0",
            Self::F => "F",
            Self::NotApplicable => "N/A",
        }
    }

    /// Grade points in tenths, kept integral so the table stays exact.
    const fn tenths(self) -> i64 {
        match self {
            Self::APlus => 45,
            Self::AZero => 40,
            Self::BPlus => 35,
            Self::BZero => 30,
            Self::CPlus => 25,
            Self::CZero => 20,
            Self::DPlus => 15,
            Self::DZero => 10,
            Self::F | Self::NotApplicable => 0,
        }
    }

    pub fn grade_point(self) -> Decimal {
        Decimal::new(self.tenths(), 1)
    }

    pub const fn bucket(self) -> Option<GradeBucket> {
        match self {
            Self::APlus | Self::AZero => Some(GradeBucket::A),
            Self::BPlus | Self::BZero => Some(GradeBucket::B),
            Self::CPlus | Self::CZero => Some(GradeBucket::C),
            Self::DPlus | Self::DZero => Some(GradeBucket::D),
            Self::F => Some(GradeBucket::F),
            Self::NotApplicable => None,
        }
    }

    pub const fn is_failing(self) -> bool {
        matches!(self, Self::F)
    }
}

/// Leading-letter bucket used by the grade distribution counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GradeBucket {
    A,
    B,
    C,
    D,
    F,
}

/// Letter and point pair produced by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub letter: LetterGrade,
    pub grade_point: Decimal,
}

/// Maps a raw percentage onto the threshold table.
///
/// The value is compared as given; callers must not round beforehand, so
/// `94.99` stays an A0 while `95` is an A+. A missing percentage classifies as
/// `N/A` with zero points.
pub fn classify(percentage: Option<Decimal>) -> Classification {
    let letter = match percentage {
        None => LetterGrade::NotApplicable,
        Some(value) => THRESHOLDS
            .iter()
            .find(|(minimum, _)| value >= Decimal::from(*minimum))
            .map(|(_, letter)| *letter)
            .unwrap_or(LetterGrade::F),
    };

    Classification {
        letter,
        grade_point: letter.grade_point(),
    }
}
