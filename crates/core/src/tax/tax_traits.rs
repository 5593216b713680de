use async_trait::async_trait;
use chrono::NaiveDate;

use super::tax_model::{NewTaxPayment, TaxEstimate, TaxPayment, TaxProfile, TaxProfileUpdate};
use crate::errors::Result;
use crate::transactions::Transaction;

#[async_trait]
pub trait TaxServiceTrait: Send + Sync {
    /// Cached profile; defaults when the user has not saved one.
    fn get_profile(&self) -> TaxProfile;
    fn get_payments(&self) -> Vec<TaxPayment>;
    async fn refresh(&self) -> Result<TaxProfile>;
    async fn save_profile(&self, update: TaxProfileUpdate) -> Result<TaxProfile>;
    /// Sets the amount paid for one quarter, creating the record if needed.
    async fn record_payment(&self, payment: NewTaxPayment) -> Result<TaxPayment>;
    fn estimate(&self, transactions: &[Transaction], year: i32, today: NaiveDate) -> TaxEstimate;
    fn clear(&self);
}
