use async_trait::async_trait;
use serde_json::Value;

use super::store_model::{Collection, ListQuery};
use crate::errors::Result;

/// Thin CRUD contract with the backing store.
///
/// Records are JSON objects with a string `id`. Writes are last-write-wins;
/// implementations do not retry.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Records of `collection` passing `query`, in the requested order.
    async fn list(&self, collection: Collection, query: ListQuery) -> Result<Vec<Value>>;

    /// Stores `record` and returns it with its generated `id`.
    async fn create(&self, collection: Collection, record: Value) -> Result<Value>;

    /// Merges `patch` into the record and returns the updated record.
    async fn update(&self, collection: Collection, id: &str, patch: Value) -> Result<Value>;

    async fn delete(&self, collection: Collection, id: &str) -> Result<()>;
}
