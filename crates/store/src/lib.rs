//! Client for the hosted table store.
//!
//! Handlers never talk to the remote store directly; they go through the
//! [`TableStore`] trait so services can be exercised against the in-memory
//! implementation in tests.

use async_trait::async_trait;
use serde_json::Value;

pub mod errors;
pub mod filter;
pub mod memory;
pub mod postgrest;

pub use errors::StoreError;
pub use filter::{Filter, Op};
pub use memory::MemoryStore;
pub use postgrest::PostgrestStore;

/// Row-level access to the hosted store. All three operations return the
/// affected rows as loosely-typed JSON, mirroring the upstream REST contract:
/// insert(table, row) -> rows, select(table, filters) -> rows,
/// update(table, patch, filters) -> rows.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Insert one row and return the created row(s).
    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, StoreError>;

    /// Select rows matching all filters. `columns` is a projection such as
    /// `"*"` or `"id, quantity"`.
    async fn select(&self, table: &str, columns: &str, filters: &[Filter])
        -> Result<Vec<Value>, StoreError>;

    /// Apply `patch` to every row matching all filters and return the
    /// updated rows.
    async fn update(&self, table: &str, patch: Value, filters: &[Filter])
        -> Result<Vec<Value>, StoreError>;
}
