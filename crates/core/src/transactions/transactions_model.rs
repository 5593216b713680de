use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{MAX_DESCRIPTION_LEN, UNCATEGORIZED};
use crate::errors::{Result, ValidationError};
use crate::store::{Collection, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(format!("Unknown transaction type: {}", other)),
        }
    }
}

/// A single income or expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// Category label, falling back to "Uncategorized" when absent or blank.
    pub fn category_label(&self) -> &str {
        match self.category.as_deref().map(str::trim) {
            Some(category) if !category.is_empty() => category,
            _ => UNCATEGORIZED,
        }
    }

    pub fn platform_label(&self) -> Option<&str> {
        self.platform
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

impl Record for Transaction {
    const COLLECTION: Collection = Collection::Transactions;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Input for creating a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub recurring: bool,
}

impl NewTransaction {
    pub fn income(amount: Decimal, date: NaiveDate) -> Self {
        Self::new(TransactionType::Income, amount, date)
    }

    pub fn expense(amount: Decimal, date: NaiveDate) -> Self {
        Self::new(TransactionType::Expense, amount, date)
    }

    fn new(transaction_type: TransactionType, amount: Decimal, date: NaiveDate) -> Self {
        Self {
            id: None,
            user_id: None,
            transaction_type,
            amount,
            category: None,
            platform: None,
            date,
            description: String::new(),
            recurring: false,
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_platform(mut self, platform: &str) -> Self {
        self.platform = Some(platform.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn recurring(mut self, recurring: bool) -> Self {
        self.recurring = recurring;
        self
    }

    /// Checks the form input and trims free-text fields.
    pub fn validate(mut self) -> Result<Self> {
        validate_amount(self.amount)?;
        validate_recurring(self.transaction_type, self.recurring)?;
        validate_description(&self.description)?;
        self.category = normalize_text(self.category);
        self.platform = normalize_text(self.platform);
        self.description = self.description.trim().to_string();
        Ok(self)
    }
}

/// Partial update; only the fields present are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<bool>,
}

impl TransactionUpdate {
    pub fn is_empty(&self) -> bool {
        self == &TransactionUpdate::default()
    }

    /// Checks the fields carried by the update on their own.
    pub fn validate_fields(&self) -> Result<()> {
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        if let (Some(transaction_type), Some(recurring)) = (self.transaction_type, self.recurring) {
            validate_recurring(transaction_type, recurring)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }

    /// Validates the update against the record it will be merged into.
    pub fn validate_against(&self, existing: &Transaction) -> Result<()> {
        self.validate_fields()?;
        let transaction_type = self.transaction_type.unwrap_or(existing.transaction_type);
        let recurring = self.recurring.unwrap_or(existing.recurring);
        validate_recurring(transaction_type, recurring)
    }
}

fn validate_amount(amount: Decimal) -> Result<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::NegativeAmount("amount".to_string()).into());
    }
    Ok(())
}

fn validate_recurring(transaction_type: TransactionType, recurring: bool) -> Result<()> {
    if recurring && transaction_type == TransactionType::Income {
        return Err(ValidationError::InvalidInput(
            "Only expenses can be marked as recurring".to_string(),
        )
        .into());
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<()> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::InvalidInput(format!(
            "Description must be at most {} characters",
            MAX_DESCRIPTION_LEN
        ))
        .into());
    }
    Ok(())
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
