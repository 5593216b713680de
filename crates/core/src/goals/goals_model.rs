//! Savings goal domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::{days_until_at, savings_progress};
use crate::errors::{Result, ValidationError};
use crate::store::{Collection, Record};
use crate::styles::Tone;

/// Domain model representing a savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub name: String,
    pub target: Decimal,
    #[serde(default)]
    pub current: Decimal,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub color: Tone,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl SavingsGoal {
    pub fn remaining(&self) -> Decimal {
        (self.target - self.current).max(Decimal::ZERO)
    }

    pub fn is_completed(&self) -> bool {
        self.current >= self.target
    }
}

impl Record for SavingsGoal {
    const COLLECTION: Collection = Collection::SavingsGoals;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Input model for creating a new goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingsGoal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub name: String,
    pub target: Decimal,
    #[serde(default)]
    pub current: Decimal,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub color: Tone,
}

impl NewSavingsGoal {
    pub fn new(name: &str, target: Decimal, deadline: NaiveDate) -> Self {
        NewSavingsGoal {
            id: None,
            user_id: None,
            name: name.to_string(),
            target,
            current: Decimal::ZERO,
            deadline,
            category: None,
            color: Tone::default(),
        }
    }

    pub fn validate(mut self) -> Result<Self> {
        self.name = validate_name(&self.name)?;
        validate_target(self.target)?;
        validate_current(self.current)?;
        self.category = self
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Ok(self)
    }
}

/// Partial update; only the fields present are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Tone>,
}

impl SavingsGoalUpdate {
    pub fn validate(mut self) -> Result<Self> {
        if let Some(name) = &self.name {
            self.name = Some(validate_name(name)?);
        }
        if let Some(target) = self.target {
            validate_target(target)?;
        }
        if let Some(current) = self.current {
            validate_current(current)?;
        }
        Ok(self)
    }
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingField("name".to_string()).into());
    }
    Ok(name.to_string())
}

fn validate_target(target: Decimal) -> Result<()> {
    if target <= Decimal::ZERO {
        return Err(ValidationError::InvalidInput(
            "Goal target must be greater than zero".to_string(),
        )
        .into());
    }
    Ok(())
}

fn validate_current(current: Decimal) -> Result<()> {
    if current < Decimal::ZERO {
        return Err(ValidationError::NegativeAmount("current".to_string()).into());
    }
    Ok(())
}

/// Progress view of one goal at a point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal: SavingsGoal,
    pub progress_percent: Decimal,
    pub days_left: i64,
    pub remaining: Decimal,
    pub completed: bool,
    pub overdue: bool,
}

impl GoalProgress {
    pub fn at(goal: &SavingsGoal, now: DateTime<Utc>) -> Self {
        let days_left = days_until_at(goal.deadline, now);
        let completed = goal.is_completed();
        GoalProgress {
            goal: goal.clone(),
            progress_percent: savings_progress(goal.current, goal.target),
            days_left,
            remaining: goal.remaining(),
            completed,
            overdue: days_left < 0 && !completed,
        }
    }

    /// "N days left", "Due today" or "Overdue".
    pub fn deadline_label(&self) -> String {
        match self.days_left {
            1 => "1 day left".to_string(),
            d if d > 0 => format!("{} days left", d),
            0 => "Due today".to_string(),
            _ => "Overdue".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsOverview {
    pub total_saved: Decimal,
    pub total_target: Decimal,
    pub overall_progress: Decimal,
    pub goals: Vec<GoalProgress>,
}

impl SavingsOverview {
    pub fn from_goals(goals: &[SavingsGoal], now: DateTime<Utc>) -> Self {
        let total_saved: Decimal = goals.iter().map(|g| g.current).sum();
        let total_target: Decimal = goals.iter().map(|g| g.target).sum();
        SavingsOverview {
            total_saved,
            total_target,
            overall_progress: savings_progress(total_saved, total_target),
            goals: goals.iter().map(|g| GoalProgress::at(g, now)).collect(),
        }
    }
}
