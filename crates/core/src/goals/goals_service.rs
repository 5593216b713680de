use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, error};
use rust_decimal::Decimal;
use std::sync::{Arc, RwLock};

use super::goals_model::{NewSavingsGoal, SavingsGoal, SavingsGoalUpdate, SavingsOverview};
use super::goals_traits::GoalServiceTrait;
use crate::auth::{require_user, AuthProvider};
use crate::errors::{Result, StoreError, ValidationError};
use crate::store::{records, DataStore, ListQuery};

pub struct GoalService {
    store: Arc<dyn DataStore>,
    auth: Arc<dyn AuthProvider>,
    goals: RwLock<Vec<SavingsGoal>>,
}

impl GoalService {
    pub fn new(store: Arc<dyn DataStore>, auth: Arc<dyn AuthProvider>) -> Self {
        GoalService {
            store,
            auth,
            goals: RwLock::new(Vec::new()),
        }
    }

    fn read_cache(&self) -> Vec<SavingsGoal> {
        self.goals
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn write_cache<F: FnOnce(&mut Vec<SavingsGoal>)>(&self, f: F) {
        let mut guard = self
            .goals
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard);
        guard.sort_by(|a, b| a.deadline.cmp(&b.deadline));
    }

    async fn find_goal(&self, id: &str) -> Result<SavingsGoal> {
        if let Some(goal) = self.read_cache().into_iter().find(|g| g.id == id) {
            return Ok(goal);
        }
        self.refresh()
            .await?
            .into_iter()
            .find(|g| g.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()).into())
    }

    async fn write_update(&self, id: &str, update: &SavingsGoalUpdate) -> Result<SavingsGoal> {
        let updated: SavingsGoal = match records::update(self.store.as_ref(), id, update).await {
            Ok(updated) => updated,
            Err(e) => {
                error!("Failed to update savings goal {}: {}", id, e);
                return Err(e);
            }
        };
        self.write_cache(|cache| {
            if let Some(slot) = cache.iter_mut().find(|g| g.id == updated.id) {
                *slot = updated.clone();
            }
        });
        Ok(updated)
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    fn get_goals(&self) -> Vec<SavingsGoal> {
        self.read_cache()
    }

    async fn refresh(&self) -> Result<Vec<SavingsGoal>> {
        let Some(user) = self.auth.current_user() else {
            self.clear();
            return Ok(Vec::new());
        };

        let query = ListQuery::new()
            .eq("userId", user.id.as_str())
            .order_by("deadline", true);
        let loaded = match records::list::<SavingsGoal>(self.store.as_ref(), query).await {
            Ok(loaded) => loaded,
            Err(e) => {
                error!("Error fetching savings goals: {}", e);
                return Err(e);
            }
        };
        debug!("Loaded {} savings goals for user {}", loaded.len(), user.id);
        self.write_cache(|cache| *cache = loaded.clone());
        Ok(loaded)
    }

    async fn create_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal> {
        let user = require_user(self.auth.as_ref())?;
        let mut new_goal = new_goal.validate()?;
        new_goal.user_id = Some(user.id);

        let created: SavingsGoal = match records::create(self.store.as_ref(), &new_goal).await {
            Ok(created) => created,
            Err(e) => {
                error!("Failed to create savings goal: {}", e);
                return Err(e);
            }
        };
        self.write_cache(|cache| cache.push(created.clone()));
        Ok(created)
    }

    async fn update_goal(&self, id: &str, update: SavingsGoalUpdate) -> Result<SavingsGoal> {
        require_user(self.auth.as_ref())?;
        let update = update.validate()?;
        self.write_update(id, &update).await
    }

    async fn delete_goal(&self, id: &str) -> Result<()> {
        require_user(self.auth.as_ref())?;
        if let Err(e) = records::delete::<SavingsGoal>(self.store.as_ref(), id).await {
            error!("Failed to delete savings goal {}: {}", id, e);
            return Err(e);
        }
        self.write_cache(|cache| cache.retain(|g| g.id != id));
        Ok(())
    }

    async fn contribute(&self, id: &str, amount: Decimal) -> Result<SavingsGoal> {
        require_user(self.auth.as_ref())?;
        if amount <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(
                "Contribution must be greater than zero".to_string(),
            )
            .into());
        }
        let goal = self.find_goal(id).await?;
        let update = SavingsGoalUpdate {
            current: Some(goal.current + amount),
            ..Default::default()
        };
        self.write_update(id, &update).await
    }

    fn overview_at(&self, now: DateTime<Utc>) -> SavingsOverview {
        SavingsOverview::from_goals(&self.read_cache(), now)
    }

    fn clear(&self) {
        self.write_cache(|cache| cache.clear());
    }
}
