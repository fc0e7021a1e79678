//! Status transition guard for grade-affecting requests.
//!
//! A record only becomes final once its request reaches `COMPLETED`; the guard
//! keeps every status write on a permitted edge of the state machine.

pub mod router;
pub mod status;

pub use router::{workflow_router, TransitionRequest};
pub use status::{
    validate_transition, validate_transition_with_reason, Transition, TransitionError,
    WorkflowStatus,
};
