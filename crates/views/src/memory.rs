use crate::error::StoreError;
use crate::store::ViewCountStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// In-process view-count store.
///
/// Backs the preview server and tests. Every increment happens under one
/// lock, so concurrent increments are never lost.
#[derive(Debug, Default)]
pub struct MemoryViewStore {
    counts: Mutex<HashMap<String, u64>>,
}

impl MemoryViewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with counts
    pub fn with_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        Self {
            counts: Mutex::new(counts.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, u64>>, StoreError> {
        self.counts
            .lock()
            .map_err(|_| StoreError::Unavailable("view counter lock poisoned".to_string()))
    }
}

#[async_trait]
impl ViewCountStore for MemoryViewStore {
    async fn get_count(&self, slug: &str) -> Result<u64, StoreError> {
        Ok(self.lock()?.get(slug).copied().unwrap_or(0))
    }

    async fn increment(&self, slug: &str) -> Result<u64, StoreError> {
        let mut counts = self.lock()?;
        let count = counts.entry(slug.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        Ok(*count)
    }
}
