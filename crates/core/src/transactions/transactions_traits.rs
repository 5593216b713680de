use async_trait::async_trait;

use super::transactions_model::{NewTransaction, Transaction, TransactionUpdate};
use crate::errors::Result;

/// Trait for the session-scoped transaction list
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    /// Cached transactions, newest first.
    fn get_transactions(&self) -> Vec<Transaction>;
    async fn refresh(&self) -> Result<Vec<Transaction>>;
    async fn add_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction>;
    async fn update_transaction(&self, id: &str, update: TransactionUpdate) -> Result<Transaction>;
    async fn delete_transaction(&self, id: &str) -> Result<()>;
    /// Drops the cached list.
    fn clear(&self);
}
