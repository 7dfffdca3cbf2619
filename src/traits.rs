//! Store abstraction for persisting product records

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ProductRecord, StoredProduct};

/// A backend that can persist product records and read them back for export.
///
/// Inserts are append-only: every call creates a new row (no dedup key, no
/// upsert) and the store assigns the creation/update timestamps.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Insert one record as a new row, returning its id.
    async fn insert(&self, record: &ProductRecord) -> Result<i64>;

    /// All stored rows, oldest first.
    async fn export_all(&self) -> Result<Vec<StoredProduct>>;
}
