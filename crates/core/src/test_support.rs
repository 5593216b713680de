//! In-crate fakes for the store and auth collaborators.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::auth::{AuthProvider, SignUpProfile, User};
use crate::errors::{AuthError, Result, StoreError};
use crate::store::{Collection, DataStore, ListQuery};

#[derive(Default)]
pub struct FakeStore {
    records: Mutex<HashMap<Collection, Vec<Value>>>,
    next_id: Mutex<u64>,
    failure: Mutex<Option<String>>,
}

impl FakeStore {
    /// The next store call fails with a network error.
    pub fn fail_next(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn seed(&self, collection: Collection, record: Value) -> Value {
        let mut record = record;
        record["id"] = Value::String(self.generate_id());
        self.records
            .lock()
            .unwrap()
            .entry(collection)
            .or_default()
            .push(record.clone());
        record
    }

    pub fn seed_transaction(&self, user_id: &str, amount: Decimal, date: NaiveDate) -> Value {
        self.seed(
            Collection::Transactions,
            json!({
                "userId": user_id,
                "type": "income",
                "amount": amount,
                "date": date,
                "description": "seeded",
            }),
        )
    }

    pub fn count(&self, collection: Collection) -> usize {
        self.records
            .lock()
            .unwrap()
            .get(&collection)
            .map_or(0, Vec::len)
    }

    fn generate_id(&self) -> String {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        format!("rec-{}", next)
    }

    fn take_failure(&self) -> Result<()> {
        match self.failure.lock().unwrap().take() {
            Some(message) => Err(StoreError::Network(message).into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DataStore for FakeStore {
    async fn list(&self, collection: Collection, query: ListQuery) -> Result<Vec<Value>> {
        self.take_failure()?;
        let records = self.records.lock().unwrap();
        let mut rows: Vec<Value> = records
            .get(&collection)
            .into_iter()
            .flatten()
            .filter(|record| query.matches(record))
            .cloned()
            .collect();
        query.sort(&mut rows);
        Ok(rows)
    }

    async fn create(&self, collection: Collection, record: Value) -> Result<Value> {
        self.take_failure()?;
        Ok(self.seed(collection, record))
    }

    async fn update(&self, collection: Collection, id: &str, patch: Value) -> Result<Value> {
        self.take_failure()?;
        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(&collection)
            .and_then(|rows| rows.iter_mut().find(|r| r["id"] == id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if let (Some(target), Value::Object(fields)) = (record.as_object_mut(), patch) {
            for (key, value) in fields {
                target.insert(key, value);
            }
        }
        Ok(record.clone())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        self.take_failure()?;
        let mut records = self.records.lock().unwrap();
        let rows = records.entry(collection).or_default();
        let before = rows.len();
        rows.retain(|r| r["id"] != id);
        if rows.len() == before {
            return Err(StoreError::NotFound(id.to_string()).into());
        }
        Ok(())
    }
}

pub struct FakeAuth {
    user: Mutex<Option<User>>,
}

impl FakeAuth {
    pub fn signed_in(user_id: &str) -> Self {
        FakeAuth {
            user: Mutex::new(Some(test_user(user_id))),
        }
    }

    pub fn signed_out() -> Self {
        FakeAuth {
            user: Mutex::new(None),
        }
    }
}

pub fn test_user(user_id: &str) -> User {
    User {
        id: user_id.to_string(),
        email: format!("{}@example.com", user_id),
        full_name: Some("Alex Rivera".to_string()),
        created_at: Utc::now(),
    }
}

#[async_trait]
impl AuthProvider for FakeAuth {
    fn current_user(&self) -> Option<User> {
        self.user.lock().unwrap().clone()
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        if password.is_empty() {
            return Err(AuthError::InvalidCredentials.into());
        }
        let user = User {
            email: email.to_string(),
            ..test_user("user-1")
        };
        *self.user.lock().unwrap() = Some(user.clone());
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str, profile: SignUpProfile) -> Result<User> {
        let mut user = self.sign_in(email, password).await?;
        user.full_name = profile.full_name;
        *self.user.lock().unwrap() = Some(user.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        *self.user.lock().unwrap() = None;
        Ok(())
    }
}
