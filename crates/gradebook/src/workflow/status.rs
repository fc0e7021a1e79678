use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Status of a grade-affecting request moving through approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    InProgress,
    Completed,
}

impl WorkflowStatus {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Pending,
            Self::Approved,
            Self::InProgress,
            Self::Completed,
            Self::Rejected,
            Self::Cancelled,
        ]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Cancelled => "Cancelled",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Outgoing edges of the state machine. Terminal states have none.
    pub const fn allowed_next(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Approved, Self::Rejected, Self::Cancelled],
            Self::Approved => &[Self::InProgress, Self::Cancelled],
            Self::InProgress => &[Self::Completed, Self::Cancelled],
            Self::Rejected | Self::Cancelled | Self::Completed => &[],
        }
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next().contains(&next)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Cancelled | Self::Completed)
    }

    /// Rejections and cancellations must carry a justification.
    pub const fn requires_reason(self) -> bool {
        matches!(self, Self::Rejected | Self::Cancelled)
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for WorkflowStatus {
    type Err = TransitionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_uppercase();
        Self::ordered()
            .into_iter()
            .find(|status| status.code() == normalized)
            .ok_or_else(|| TransitionError::UnknownStatus(raw.trim().to_string()))
    }
}

/// Rejected status change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("unknown workflow status `{0}`")]
    UnknownStatus(String),
    #[error("transition from {from} to {to} is not permitted")]
    Conflict {
        from: WorkflowStatus,
        to: WorkflowStatus,
    },
    #[error("moving to {0} requires a reason")]
    MissingReason(WorkflowStatus),
}

/// Accepted status change, ready to be written upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub current: WorkflowStatus,
    pub next: WorkflowStatus,
    pub terminal: bool,
    pub requires_reason: bool,
}

/// Checks one edge given raw status codes.
pub fn validate_transition(current: &str, next: &str) -> Result<Transition, TransitionError> {
    let current: WorkflowStatus = current.parse()?;
    let next: WorkflowStatus = next.parse()?;
    check_edge(current, next)
}

/// Like [`validate_transition`], but also enforces the reason requirement of
/// the target state. Blank reasons count as missing.
pub fn validate_transition_with_reason(
    current: &str,
    next: &str,
    reason: Option<&str>,
) -> Result<Transition, TransitionError> {
    let transition = validate_transition(current, next)?;
    let has_reason = reason.is_some_and(|text| !text.trim().is_empty());
    if transition.requires_reason && !has_reason {
        return Err(TransitionError::MissingReason(transition.next));
    }
    Ok(transition)
}

fn check_edge(
    current: WorkflowStatus,
    next: WorkflowStatus,
) -> Result<Transition, TransitionError> {
    if !current.can_transition_to(next) {
        return Err(TransitionError::Conflict {
            from: current,
            to: next,
        });
    }

    Ok(Transition {
        current,
        next,
        terminal: next.is_terminal(),
        requires_reason: next.requires_reason(),
    })
}
