//! Savings goals: models, progress views and the session-scoped service.

mod goals_model;
mod goals_service;
mod goals_traits;

pub use goals_model::{GoalProgress, NewSavingsGoal, SavingsGoal, SavingsGoalUpdate, SavingsOverview};
pub use goals_service::GoalService;
pub use goals_traits::GoalServiceTrait;
