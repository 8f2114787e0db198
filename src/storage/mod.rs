//! Persistence of seen postings.
//!
//! A source's known postings live in a single snapshot: a JSON array that is
//! rewritten whole whenever new postings show up.
//!
//! ```text
//! /tmp/jobs-cern
//! [
//!   { "DetailsURL": "https://...", "Title": "Applied Physicist", "Department": "EP" },
//!   ...
//! ]
//! ```
//!
//! [`JobList`] holds the snapshot in memory and decides when to write it back;
//! a [`SnapshotStore`] moves the bytes.

pub mod job_list;
pub mod local;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use job_list::JobList;
pub use local::LocalStorage;

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Human readable location, used in logs and errors.
    fn location(&self) -> String;

    /// Read the stored snapshot, `None` if nothing has been stored yet.
    async fn read(&self) -> Result<Option<Vec<u8>>>;

    /// Replace the stored snapshot with `bytes`.
    async fn write(&self, bytes: &[u8]) -> Result<()>;
}
