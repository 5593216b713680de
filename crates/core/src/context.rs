//! Application state container shared by every view.

use chrono::{Datelike, NaiveDate, Utc};
use log::{info, warn};
use std::sync::{Arc, RwLock};

use crate::auth::{require_user, AuthProvider, SignUpProfile, User};
use crate::dashboard::{build_dashboard, DashboardSummary};
use crate::errors::Result;
use crate::formatters::DisplaySettings;
use crate::goals::{GoalService, GoalServiceTrait, SavingsOverview};
use crate::insights::{build_insights, Insights};
use crate::store::DataStore;
use crate::tax::{TaxEstimate, TaxService, TaxServiceTrait};
use crate::transactions::{TransactionService, TransactionServiceTrait};

pub struct AppContext {
    display: Arc<RwLock<DisplaySettings>>,
    auth: Arc<dyn AuthProvider>,
    store: Arc<dyn DataStore>,

    // Services
    transaction_service: Arc<dyn TransactionServiceTrait>,
    goal_service: Arc<dyn GoalServiceTrait>,
    tax_service: Arc<dyn TaxServiceTrait>,
}

impl AppContext {
    pub fn new(
        store: Arc<dyn DataStore>,
        auth: Arc<dyn AuthProvider>,
        display: DisplaySettings,
    ) -> Self {
        AppContext {
            display: Arc::new(RwLock::new(display)),
            transaction_service: Arc::new(TransactionService::new(store.clone(), auth.clone())),
            goal_service: Arc::new(GoalService::new(store.clone(), auth.clone())),
            tax_service: Arc::new(TaxService::new(store.clone(), auth.clone())),
            auth,
            store,
        }
    }

    pub fn display(&self) -> DisplaySettings {
        *self
            .display
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn update_display(&self, display: DisplaySettings) {
        *self
            .display
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = display;
    }

    pub fn auth(&self) -> Arc<dyn AuthProvider> {
        Arc::clone(&self.auth)
    }

    pub fn store(&self) -> Arc<dyn DataStore> {
        Arc::clone(&self.store)
    }

    pub fn transaction_service(&self) -> Arc<dyn TransactionServiceTrait> {
        Arc::clone(&self.transaction_service)
    }

    pub fn goal_service(&self) -> Arc<dyn GoalServiceTrait> {
        Arc::clone(&self.goal_service)
    }

    pub fn tax_service(&self) -> Arc<dyn TaxServiceTrait> {
        Arc::clone(&self.tax_service)
    }

    pub fn current_user(&self) -> Option<User> {
        self.auth.current_user()
    }

    /// Loads every view list for the signed-in user.
    ///
    /// The cached lists live as long as the returned guard.
    pub async fn begin_session(&self) -> Result<SessionGuard> {
        let user = require_user(self.auth.as_ref())?;
        let guard = SessionGuard {
            user: user.clone(),
            transaction_service: self.transaction_service(),
            goal_service: self.goal_service(),
            tax_service: self.tax_service(),
        };
        // On failure the guard drops here and clears whatever was loaded.
        self.transaction_service.refresh().await?;
        self.goal_service.refresh().await?;
        self.tax_service.refresh().await?;
        info!("Session started for user {}", user.id);
        Ok(guard)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionGuard> {
        self.auth.sign_in(email, password).await?;
        self.begin_session().await
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: SignUpProfile,
    ) -> Result<SessionGuard> {
        self.auth.sign_up(email, password, profile).await?;
        self.begin_session().await
    }

    /// Signs out and ends `session`, clearing every cached list.
    pub async fn sign_out(&self, session: Option<SessionGuard>) -> Result<()> {
        drop(session);
        if let Err(e) = self.auth.sign_out().await {
            warn!("Sign out failed: {}", e);
            return Err(e);
        }
        Ok(())
    }

    pub fn dashboard_at(&self, today: NaiveDate) -> DashboardSummary {
        let user = self.current_user();
        build_dashboard(
            user.as_ref(),
            &self.transaction_service.get_transactions(),
            &self.goal_service.get_goals(),
            &self.display(),
            today,
        )
    }

    pub fn tax_estimate_at(&self, year: i32, today: NaiveDate) -> TaxEstimate {
        self.tax_service
            .estimate(&self.transaction_service.get_transactions(), year, today)
    }

    pub fn insights_at(&self, today: NaiveDate) -> Insights {
        let transactions = self.transaction_service.get_transactions();
        let estimate = self.tax_service.estimate(&transactions, today.year(), today);
        build_insights(&transactions, &estimate, today)
    }

    pub fn savings_overview(&self) -> SavingsOverview {
        self.goal_service.overview_at(Utc::now())
    }
}

/// Scope of one signed-in session.
///
/// Dropping the guard clears every session-scoped list, whatever the exit path.
pub struct SessionGuard {
    user: User,
    transaction_service: Arc<dyn TransactionServiceTrait>,
    goal_service: Arc<dyn GoalServiceTrait>,
    tax_service: Arc<dyn TaxServiceTrait>,
}

impl SessionGuard {
    pub fn user(&self) -> &User {
        &self.user
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.transaction_service.clear();
        self.goal_service.clear();
        self.tax_service.clear();
        info!("Session ended for user {}", self.user.id);
    }
}
