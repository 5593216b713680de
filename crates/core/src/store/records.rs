//! Typed access to [`DataStore`] collections.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::store_model::{Collection, ListQuery};
use super::store_traits::DataStore;
use crate::errors::{Result, StoreError};

/// A domain type persisted in one collection.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;

    fn id(&self) -> &str;
}

pub async fn list<R: Record>(store: &dyn DataStore, query: ListQuery) -> Result<Vec<R>> {
    let rows = store.list(R::COLLECTION, query).await?;
    rows.into_iter().map(from_value).collect()
}

/// Creates a record from any serializable payload (usually a `New*` type).
pub async fn create<R: Record, P: Serialize + Sync>(store: &dyn DataStore, payload: &P) -> Result<R> {
    let value = to_object(payload)?;
    let stored = store.create(R::COLLECTION, value).await?;
    from_value(stored)
}

pub async fn update<R: Record, P: Serialize + Sync>(
    store: &dyn DataStore,
    id: &str,
    patch: &P,
) -> Result<R> {
    let value = to_object(patch)?;
    let stored = store.update(R::COLLECTION, id, value).await?;
    from_value(stored)
}

pub async fn delete<R: Record>(store: &dyn DataStore, id: &str) -> Result<()> {
    store.delete(R::COLLECTION, id).await
}

fn from_value<R: Record>(value: Value) -> Result<R> {
    serde_json::from_value(value).map_err(|e| {
        StoreError::Serialization(format!("{} record: {}", R::COLLECTION, e)).into()
    })
}

fn to_object<P: Serialize>(payload: &P) -> Result<Value> {
    let value = serde_json::to_value(payload)?;
    if !value.is_object() {
        return Err(StoreError::Serialization("records must be JSON objects".to_string()).into());
    }
    Ok(value)
}
