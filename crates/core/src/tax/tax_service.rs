use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, error};
use std::sync::{Arc, RwLock};

use super::tax_calculator::build_tax_estimate;
use super::tax_model::{NewTaxPayment, TaxEstimate, TaxPayment, TaxProfile, TaxProfileUpdate};
use super::tax_traits::TaxServiceTrait;
use crate::auth::{require_user, AuthProvider};
use crate::errors::Result;
use crate::store::{records, DataStore, ListQuery};
use crate::transactions::Transaction;

#[derive(Default)]
struct TaxState {
    profile: TaxProfile,
    payments: Vec<TaxPayment>,
}

pub struct TaxService {
    store: Arc<dyn DataStore>,
    auth: Arc<dyn AuthProvider>,
    state: RwLock<TaxState>,
}

impl TaxService {
    pub fn new(store: Arc<dyn DataStore>, auth: Arc<dyn AuthProvider>) -> Self {
        TaxService {
            store,
            auth,
            state: RwLock::new(TaxState::default()),
        }
    }

    fn with_state<T, F: FnOnce(&mut TaxState) -> T>(&self, f: F) -> T {
        let mut guard = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

#[async_trait]
impl TaxServiceTrait for TaxService {
    fn get_profile(&self) -> TaxProfile {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .profile
            .clone()
    }

    fn get_payments(&self) -> Vec<TaxPayment> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .payments
            .clone()
    }

    async fn refresh(&self) -> Result<TaxProfile> {
        let Some(user) = self.auth.current_user() else {
            self.clear();
            return Ok(TaxProfile::default());
        };

        let owner = ListQuery::new().eq("userId", user.id.as_str());
        let profiles = records::list::<TaxProfile>(self.store.as_ref(), owner.clone())
            .await
            .map_err(|e| {
                error!("Error fetching tax profile: {}", e);
                e
            })?;
        let payments = records::list::<TaxPayment>(self.store.as_ref(), owner.order_by("quarter", true))
            .await
            .map_err(|e| {
                error!("Error fetching tax payments: {}", e);
                e
            })?;
        debug!("Loaded {} tax payments for user {}", payments.len(), user.id);

        let profile = profiles.into_iter().next().unwrap_or_else(|| TaxProfile {
            user_id: Some(user.id.clone()),
            ..TaxProfile::default()
        });
        self.with_state(|state| {
            state.profile = profile.clone();
            state.payments = payments;
        });
        Ok(profile)
    }

    async fn save_profile(&self, update: TaxProfileUpdate) -> Result<TaxProfile> {
        let user = require_user(self.auth.as_ref())?;
        let current = self.get_profile();
        let mut merged = current.merged(&update);
        merged.validate()?;

        let saved: Result<TaxProfile> = if current.is_stored() {
            records::update(self.store.as_ref(), &current.id, &update).await
        } else {
            merged.user_id = Some(user.id);
            let payload = serde_json::json!({
                "userId": merged.user_id,
                "taxRate": merged.tax_rate,
                "deductions": merged.deductions,
                "setAside": merged.set_aside,
            });
            records::create(self.store.as_ref(), &payload).await
        };

        let saved = saved.map_err(|e| {
            error!("Failed to save tax profile: {}", e);
            e
        })?;
        self.with_state(|state| state.profile = saved.clone());
        Ok(saved)
    }

    async fn record_payment(&self, payment: NewTaxPayment) -> Result<TaxPayment> {
        let user = require_user(self.auth.as_ref())?;
        payment.validate()?;

        let existing = records::list::<TaxPayment>(
            self.store.as_ref(),
            ListQuery::new()
                .eq("userId", user.id.as_str())
                .eq("year", payment.year)
                .eq("quarter", payment.quarter),
        )
        .await?
        .into_iter()
        .next();

        let saved: Result<TaxPayment> = match existing {
            Some(existing) => {
                let patch = serde_json::json!({ "paid": payment.paid });
                records::update(self.store.as_ref(), &existing.id, &patch).await
            }
            None => {
                let payload = NewTaxPayment {
                    user_id: Some(user.id),
                    ..payment
                };
                records::create(self.store.as_ref(), &payload).await
            }
        };
        let saved = saved.map_err(|e| {
            error!("Failed to record tax payment: {}", e);
            e
        })?;

        self.with_state(|state| {
            state.payments.retain(|p| p.id != saved.id);
            state.payments.push(saved.clone());
            state
                .payments
                .sort_by(|a, b| (a.year, a.quarter).cmp(&(b.year, b.quarter)));
        });
        Ok(saved)
    }

    fn estimate(&self, transactions: &[Transaction], year: i32, today: NaiveDate) -> TaxEstimate {
        let state = self
            .state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        build_tax_estimate(transactions, &state.profile, &state.payments, year, today)
    }

    fn clear(&self) {
        self.with_state(|state| *state = TaxState::default());
    }
}
