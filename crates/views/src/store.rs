use crate::error::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Body of both `GET /views/{slug}` and `POST /views/{slug}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Counter service keyed by slug.
///
/// Implementations must apply every accepted `increment` exactly once, with
/// no lost updates under concurrent callers. Counts never go down.
#[async_trait]
pub trait ViewCountStore: Send + Sync {
    /// Current count; a slug that was never incremented reads as 0
    async fn get_count(&self, slug: &str) -> Result<u64, StoreError>;

    /// Add one view and return the new count
    async fn increment(&self, slug: &str) -> Result<u64, StoreError>;
}
