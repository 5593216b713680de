use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::goals_model::{NewSavingsGoal, SavingsGoal, SavingsGoalUpdate, SavingsOverview};
use crate::errors::Result;

/// Trait for goal service operations
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    /// Cached goals, nearest deadline first.
    fn get_goals(&self) -> Vec<SavingsGoal>;
    async fn refresh(&self) -> Result<Vec<SavingsGoal>>;
    async fn create_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal>;
    async fn update_goal(&self, id: &str, update: SavingsGoalUpdate) -> Result<SavingsGoal>;
    async fn delete_goal(&self, id: &str) -> Result<()>;
    /// Adds `amount` to the goal's saved balance.
    async fn contribute(&self, id: &str, amount: Decimal) -> Result<SavingsGoal>;
    fn overview_at(&self, now: DateTime<Utc>) -> SavingsOverview;
    fn clear(&self);
}
