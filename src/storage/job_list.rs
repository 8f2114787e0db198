//! Known postings of one source and novelty detection against them.

use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::models::Posting;
use crate::pipeline::calculate_diff;
use crate::storage::{LocalStorage, SnapshotStore};

/// Snapshot of the postings seen on the last run that found something new.
pub struct JobList<S: SnapshotStore = LocalStorage> {
    store: S,
    jobs: Vec<Posting>,
}

impl JobList<LocalStorage> {
    /// Load the snapshot kept in a local file.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::load(LocalStorage::new(path)).await
    }
}

impl<S: SnapshotStore> JobList<S> {
    /// Load the snapshot from `store`.
    ///
    /// A missing or empty snapshot starts an empty list and writes it back
    /// right away so the file exists for the next run. Content that does not
    /// decode is an error.
    pub async fn load(store: S) -> Result<Self> {
        let bytes = store.read().await?;

        let jobs = match bytes {
            Some(bytes) if !bytes.iter().all(u8::is_ascii_whitespace) => {
                serde_json::from_slice(&bytes)
                    .map_err(|e| AppError::state(store.location(), format!("cannot decode: {e}")))?
            }
            _ => {
                log::info!("No known postings at {}, starting empty", store.location());
                let list = Self {
                    store,
                    jobs: Vec::new(),
                };
                list.save().await?;
                return Ok(list);
            }
        };

        let list = Self { store, jobs };
        log::debug!("Loaded {} known postings from {}", list.jobs.len(), list.file());
        Ok(list)
    }

    /// Location of the persisted snapshot.
    pub fn file(&self) -> String {
        self.store.location()
    }

    /// Known postings, in last-fetch order.
    pub fn jobs(&self) -> &[Posting] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Whether an equivalent posting is known.
    pub fn has(&self, posting: &Posting) -> bool {
        crate::pipeline::diff::contains(&self.jobs, posting)
    }

    /// Return the candidates not known yet and, if there are any, make
    /// `candidates` the new snapshot and persist it.
    ///
    /// When nothing is new the list is left untouched and nothing is written.
    pub async fn diff_and_save(&mut self, candidates: Vec<Posting>) -> Result<Vec<Posting>> {
        let diff = calculate_diff(&self.jobs, &candidates);
        if !diff.has_new() {
            log::debug!("No new postings for {}", self.file());
            return Ok(Vec::new());
        }

        log::info!(
            "Diff: {} changes ({} new, {} no longer listed)",
            diff.change_count(),
            diff.added.len(),
            diff.removed.len()
        );

        self.jobs = candidates;
        self.save().await?;
        Ok(diff.added)
    }

    /// Write the whole list, replacing what was stored before.
    async fn save(&self) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&self.jobs)?;
        self.store.write(&bytes).await?;
        log::debug!("Saved {} postings to {}", self.jobs.len(), self.file());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;

    /// In-memory store that counts writes.
    #[derive(Clone, Default)]
    struct MemoryStore {
        data: Arc<Mutex<Option<Vec<u8>>>>,
        writes: Arc<AtomicUsize>,
    }

    impl MemoryStore {
        fn with(postings: &[Posting]) -> Self {
            let store = Self::default();
            *store.data.lock().unwrap() = Some(serde_json::to_vec(postings).unwrap());
            store
        }

        fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        fn stored(&self) -> Vec<Posting> {
            let data = self.data.lock().unwrap();
            serde_json::from_slice(data.as_deref().unwrap()).unwrap()
        }
    }

    #[async_trait]
    impl SnapshotStore for MemoryStore {
        fn location(&self) -> String {
            "memory".to_string()
        }

        async fn read(&self) -> Result<Option<Vec<u8>>> {
            Ok(self.data.lock().unwrap().clone())
        }

        async fn write(&self, bytes: &[u8]) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            *self.data.lock().unwrap() = Some(bytes.to_vec());
            Ok(())
        }
    }

    fn a() -> Posting {
        Posting::new("A", "D1", "u1")
    }
    fn b() -> Posting {
        Posting::new("B", "D2", "u2")
    }
    fn c() -> Posting {
        Posting::new("C", "D3", "u3")
    }

    #[tokio::test]
    async fn test_has_ignores_url() {
        let list = JobList::load(MemoryStore::with(&[a()])).await.unwrap();
        assert!(list.has(&Posting::new("A", "D1", "https://elsewhere.example/9")));
        assert!(!list.has(&Posting::new("A", "D2", "u1")));
    }

    #[tokio::test]
    async fn test_missing_file_initializes_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("jobs-cern");

        let list = JobList::open(&path).await.unwrap();
        assert!(list.is_empty());

        let content = std::fs::read_to_string(&path).unwrap();
        let stored: Vec<Posting> = serde_json::from_str(&content).unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn test_empty_file_initializes_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("jobs-cern");
        std::fs::write(&path, "").unwrap();

        let list = JobList::open(&path).await.unwrap();
        assert!(list.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "[]");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("jobs-cern");
        std::fs::write(&path, "{ not json").unwrap();

        let result = JobList::open(&path).await;
        assert!(matches!(result, Err(AppError::State { .. })));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn test_no_novelty_writes_nothing() {
        let store = MemoryStore::with(&[a(), b()]);
        let mut list = JobList::load(store.clone()).await.unwrap();

        let found = list.diff_and_save(vec![b(), a()]).await.unwrap();
        assert!(found.is_empty());
        assert_eq!(store.writes(), 0);
        assert_eq!(list.jobs(), &[a(), b()]);
    }

    #[tokio::test]
    async fn test_novelty_replaces_snapshot() {
        let store = MemoryStore::with(&[a()]);
        let mut list = JobList::load(store.clone()).await.unwrap();

        let found = list.diff_and_save(vec![a(), c()]).await.unwrap();
        assert_eq!(found, vec![c()]);
        assert_eq!(store.writes(), 1);
        assert_eq!(store.stored(), vec![a(), c()]);
        assert_eq!(list.jobs(), &[a(), c()]);
    }

    #[tokio::test]
    async fn test_vanished_postings_are_forgotten() {
        let store = MemoryStore::with(&[a(), b()]);
        let mut list = JobList::load(store.clone()).await.unwrap();

        let found = list.diff_and_save(vec![c()]).await.unwrap();
        assert_eq!(found, vec![c()]);
        assert_eq!(store.stored(), vec![c()]);
    }

    #[tokio::test]
    async fn test_round_trip() {
        let tmp = TempDir::new().unwrap();
        for postings in [vec![], vec![a()], vec![c(), a(), b()]] {
            let path = tmp.path().join(format!("jobs-{}", postings.len()));
            std::fs::write(&path, serde_json::to_vec_pretty(&postings).unwrap()).unwrap();

            let list = JobList::open(&path).await.unwrap();
            assert_eq!(list.jobs(), postings.as_slice());
        }
    }

    #[tokio::test]
    async fn test_saved_file_reloads() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("jobs-cern");

        let mut list = JobList::open(&path).await.unwrap();
        list.diff_and_save(vec![a(), b()]).await.unwrap();

        let reloaded = JobList::open(&path).await.unwrap();
        assert_eq!(reloaded.jobs(), &[a(), b()]);
    }
}
