use async_trait::async_trait;
use log::{debug, error};
use std::sync::{Arc, RwLock};

use super::transactions_model::{NewTransaction, Transaction, TransactionUpdate};
use super::transactions_traits::TransactionServiceTrait;
use crate::auth::{require_user, AuthProvider};
use crate::errors::Result;
use crate::store::{records, DataStore, ListQuery};

pub struct TransactionService {
    store: Arc<dyn DataStore>,
    auth: Arc<dyn AuthProvider>,
    transactions: RwLock<Vec<Transaction>>,
}

impl TransactionService {
    pub fn new(store: Arc<dyn DataStore>, auth: Arc<dyn AuthProvider>) -> Self {
        TransactionService {
            store,
            auth,
            transactions: RwLock::new(Vec::new()),
        }
    }

    fn write_cache<F: FnOnce(&mut Vec<Transaction>)>(&self, f: F) {
        let mut guard = self
            .transactions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard);
    }

    fn find_cached(&self, id: &str) -> Option<Transaction> {
        self.transactions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }
}

// Newest first; equal dates keep insertion order.
fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    fn get_transactions(&self) -> Vec<Transaction> {
        self.transactions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    async fn refresh(&self) -> Result<Vec<Transaction>> {
        let Some(user) = self.auth.current_user() else {
            self.clear();
            return Ok(Vec::new());
        };

        let query = ListQuery::new()
            .eq("userId", user.id.as_str())
            .order_by("date", false);
        let loaded = match records::list::<Transaction>(self.store.as_ref(), query).await {
            Ok(loaded) => loaded,
            Err(e) => {
                error!("Error fetching transactions: {}", e);
                return Err(e);
            }
        };
        debug!("Loaded {} transactions for user {}", loaded.len(), user.id);
        self.write_cache(|cache| *cache = loaded.clone());
        Ok(loaded)
    }

    async fn add_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        let user = require_user(self.auth.as_ref())?;
        let mut new_transaction = new_transaction.validate()?;
        new_transaction.user_id = Some(user.id);

        let created: Transaction =
            match records::create(self.store.as_ref(), &new_transaction).await {
                Ok(created) => created,
                Err(e) => {
                    error!("Failed to add transaction: {}", e);
                    return Err(e);
                }
            };

        self.write_cache(|cache| {
            let position = cache
                .iter()
                .position(|t| t.date <= created.date)
                .unwrap_or(cache.len());
            cache.insert(position, created.clone());
        });
        Ok(created)
    }

    async fn update_transaction(&self, id: &str, update: TransactionUpdate) -> Result<Transaction> {
        require_user(self.auth.as_ref())?;
        match self.find_cached(id) {
            Some(existing) => update.validate_against(&existing)?,
            None => update.validate_fields()?,
        }

        let updated: Transaction = match records::update(self.store.as_ref(), id, &update).await {
            Ok(updated) => updated,
            Err(e) => {
                error!("Failed to update transaction {}: {}", id, e);
                return Err(e);
            }
        };

        self.write_cache(|cache| {
            if let Some(slot) = cache.iter_mut().find(|t| t.id == updated.id) {
                *slot = updated.clone();
            }
            sort_newest_first(cache);
        });
        Ok(updated)
    }

    async fn delete_transaction(&self, id: &str) -> Result<()> {
        require_user(self.auth.as_ref())?;
        if let Err(e) = records::delete::<Transaction>(self.store.as_ref(), id).await {
            error!("Failed to delete transaction {}: {}", id, e);
            return Err(e);
        }
        self.write_cache(|cache| cache.retain(|t| t.id != id));
        Ok(())
    }

    fn clear(&self) {
        self.write_cache(|cache| cache.clear());
    }
}
