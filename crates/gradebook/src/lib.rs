//! Grade aggregation and transcript generation.
//!
//! The engine under [`transcripts`] is pure: it turns one student's course
//! results into a transcript document. [`workflow`] holds the status guard
//! that decides which upstream state changes may reach a grade record.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod transcripts;
pub mod workflow;
