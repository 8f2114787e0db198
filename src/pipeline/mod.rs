//! Pipeline entry points.
//!
//! - `run_pipeline`: check every configured source and notify new postings
//! - `calculate_diff`: compare a fetch with the known snapshot

pub mod diff;
pub mod run;

pub use diff::{DiffResult, calculate_diff};
pub use run::{SourceReport, run_pipeline, run_source};
