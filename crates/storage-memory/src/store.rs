use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use gigledger_core::errors::{Result, StoreError};
use gigledger_core::store::{Collection, DataStore, ListQuery};

/// Records held in memory, one vector per collection in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Map<String, Value>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&collection)
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        Collection::ALL.iter().all(|c| self.len(*c) == 0)
    }
}

fn into_object(record: Value) -> Result<Map<String, Value>> {
    match record {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Serialization(format!(
            "expected a JSON object, got {}",
            other
        ))
        .into()),
    }
}

fn record_id(record: &Map<String, Value>) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn list(&self, collection: Collection, query: ListQuery) -> Result<Vec<Value>> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut rows: Vec<Value> = collections
            .get(&collection)
            .into_iter()
            .flatten()
            .map(|record| Value::Object(record.clone()))
            .filter(|record| query.matches(record))
            .collect();
        query.sort(&mut rows);
        Ok(rows)
    }

    async fn create(&self, collection: Collection, record: Value) -> Result<Value> {
        let mut record = into_object(record)?;
        let id = match record_id(&record) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        record.insert("id".to_string(), Value::String(id.clone()));
        record
            .entry("createdAt")
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));

        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let rows = collections.entry(collection).or_default();
        if rows.iter().any(|r| record_id(r) == Some(id.as_str())) {
            return Err(StoreError::Rejected {
                status: 409,
                message: format!("duplicate id {} in {}", id, collection),
            }
            .into());
        }
        rows.push(record.clone());
        debug!("Created {} record {}", collection, id);
        Ok(Value::Object(record))
    }

    async fn update(&self, collection: Collection, id: &str, patch: Value) -> Result<Value> {
        let patch = into_object(patch)?;
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let record = collections
            .get_mut(&collection)
            .and_then(|rows| rows.iter_mut().find(|r| record_id(r) == Some(id)))
            .ok_or_else(|| StoreError::NotFound(format!("{} {}", collection, id)))?;

        for (key, value) in patch {
            if key != "id" {
                record.insert(key, value);
            }
        }
        Ok(Value::Object(record.clone()))
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let rows = collections.entry(collection).or_default();
        let before = rows.len();
        rows.retain(|r| record_id(r) != Some(id));
        if rows.len() == before {
            return Err(StoreError::NotFound(format!("{} {}", collection, id)).into());
        }
        debug!("Deleted {} record {}", collection, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gigledger_core::errors::Error;
    use gigledger_core::store::records;
    use gigledger_core::transactions::{NewTransaction, Transaction};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, d).unwrap()
    }

    #[tokio::test]
    async fn created_transaction_is_listed_once_unchanged() {
        let store = MemoryStore::new();
        let mut input = NewTransaction::expense(dec!(65.4), day(28))
            .with_category("Gas")
            .with_description("Shell Station")
            .recurring(true);
        input.user_id = Some("user-1".into());

        let created: Transaction = records::create(&store, &input).await.unwrap();
        let listed: Vec<Transaction> =
            records::list(&store, ListQuery::new().eq("userId", "user-1"))
                .await
                .unwrap();

        assert_eq!(listed.iter().filter(|t| t.id == created.id).count(), 1);
        let stored = listed.into_iter().find(|t| t.id == created.id).unwrap();
        assert_eq!(stored, created);
        assert_eq!(stored.amount, dec!(65.4));
        assert_eq!(stored.category.as_deref(), Some("Gas"));
        assert!(stored.recurring);
        assert!(stored.created_at.is_some());
    }

    #[tokio::test]
    async fn list_filters_and_orders() {
        let store = MemoryStore::new();
        for (user, date) in [("a", "2024-11-02"), ("b", "2024-11-03"), ("a", "2024-11-05")] {
            store
                .create(Collection::Transactions, json!({"userId": user, "date": date}))
                .await
                .unwrap();
        }
        let rows = store
            .list(
                Collection::Transactions,
                ListQuery::new().eq("userId", "a").order_by("date", false),
            )
            .await
            .unwrap();
        let dates: Vec<_> = rows.iter().map(|r| r["date"].as_str().unwrap()).collect();
        assert_eq!(dates, vec!["2024-11-05", "2024-11-02"]);
        assert_eq!(store.len(Collection::SavingsGoals), 0);
    }

    #[tokio::test]
    async fn update_merges_and_unknown_ids_fail() {
        let store = MemoryStore::new();
        let created = store
            .create(Collection::SavingsGoals, json!({"name": "Laptop", "current": 10}))
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap().to_string();

        let updated = store
            .update(Collection::SavingsGoals, &id, json!({"current": 25, "id": "hijack"}))
            .await
            .unwrap();
        assert_eq!(updated["name"], "Laptop");
        assert_eq!(updated["current"], 25);
        assert_eq!(updated["id"], id.as_str());

        let err = store
            .update(Collection::SavingsGoals, "missing", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let store = MemoryStore::new();
        let created = store
            .create(Collection::TaxPayments, json!({"quarter": 1}))
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap();
        store.delete(Collection::TaxPayments, id).await.unwrap();
        assert!(store.is_empty());
        assert!(store.delete(Collection::TaxPayments, id).await.is_err());
    }

    #[tokio::test]
    async fn rejects_non_objects_and_duplicate_ids() {
        let store = MemoryStore::new();
        assert!(store
            .create(Collection::Transactions, json!([1, 2]))
            .await
            .is_err());
        store
            .create(Collection::Transactions, json!({"id": "t1"}))
            .await
            .unwrap();
        let err = store
            .create(Collection::Transactions, json!({"id": "t1"}))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Store(StoreError::Rejected { status: 409, .. })
        ));
    }
}
