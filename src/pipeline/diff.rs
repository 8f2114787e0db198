//! Diff calculation between the known snapshot and a fresh fetch.
//!
//! Postings are matched by title and department only; see
//! [`Posting::same_posting`].

use crate::models::Posting;

/// Result of comparing a fetch against the known snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Fetched postings absent from the snapshot, in fetch order
    pub added: Vec<Posting>,
    /// Known postings no longer listed, in snapshot order
    pub removed: Vec<Posting>,
}

impl DiffResult {
    /// Check if anything new was found.
    pub fn has_new(&self) -> bool {
        !self.added.is_empty()
    }

    /// Get the total number of changes.
    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len()
    }
}

/// Whether `posting` is already part of `known`.
///
/// A linear scan; listings hold at most a few hundred postings.
pub fn contains(known: &[Posting], posting: &Posting) -> bool {
    known.iter().any(|k| k.same_posting(posting))
}

/// Calculate the diff between the known snapshot and the current fetch.
pub fn calculate_diff(known: &[Posting], current: &[Posting]) -> DiffResult {
    let added = current
        .iter()
        .filter(|p| !contains(known, p))
        .cloned()
        .collect();

    let removed = known
        .iter()
        .filter(|p| !contains(current, p))
        .cloned()
        .collect();

    DiffResult { added, removed }
}
