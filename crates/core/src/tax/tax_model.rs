use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calculations::TaxOptions;
use crate::constants::DEFAULT_TAX_RATE;
use crate::errors::{Result, ValidationError};
use crate::store::{Collection, Record};

/// Per-user inputs of the tax estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Decimal,
    #[serde(default)]
    pub deductions: Decimal,
    #[serde(default)]
    pub set_aside: Decimal,
}

fn default_tax_rate() -> Decimal {
    DEFAULT_TAX_RATE
}

impl Default for TaxProfile {
    fn default() -> Self {
        TaxProfile {
            id: String::new(),
            user_id: None,
            tax_rate: DEFAULT_TAX_RATE,
            deductions: Decimal::ZERO,
            set_aside: Decimal::ZERO,
        }
    }
}

impl TaxProfile {
    /// Whether the profile has been saved to the store yet.
    pub fn is_stored(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn options(&self) -> TaxOptions {
        TaxOptions {
            tax_rate: self.tax_rate,
            deductions: self.deductions,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.tax_rate < Decimal::ZERO || self.tax_rate > Decimal::ONE {
            return Err(ValidationError::InvalidInput(
                "Tax rate must be between 0 and 1".to_string(),
            )
            .into());
        }
        if self.deductions < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount("deductions".to_string()).into());
        }
        if self.set_aside < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount("setAside".to_string()).into());
        }
        Ok(())
    }

    /// The profile with `update` applied.
    pub fn merged(&self, update: &TaxProfileUpdate) -> TaxProfile {
        TaxProfile {
            tax_rate: update.tax_rate.unwrap_or(self.tax_rate),
            deductions: update.deductions.unwrap_or(self.deductions),
            set_aside: update.set_aside.unwrap_or(self.set_aside),
            ..self.clone()
        }
    }
}

impl Record for TaxProfile {
    const COLLECTION: Collection = Collection::TaxProfiles;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deductions: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_aside: Option<Decimal>,
}

/// Amount paid towards one quarter's estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxPayment {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub year: i32,
    pub quarter: u8,
    pub paid: Decimal,
}

impl Record for TaxPayment {
    const COLLECTION: Collection = Collection::TaxPayments;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTaxPayment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub year: i32,
    pub quarter: u8,
    pub paid: Decimal,
}

impl NewTaxPayment {
    pub fn validate(&self) -> Result<()> {
        if !(1..=4).contains(&self.quarter) {
            return Err(ValidationError::InvalidInput(format!(
                "Quarter must be between 1 and 4, got {}",
                self.quarter
            ))
            .into());
        }
        if self.paid < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount("paid".to_string()).into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Overdue,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Overdue => "overdue",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterlyPayment {
    /// Label such as "Q1 2024".
    pub quarter: String,
    pub due: NaiveDate,
    pub amount: Decimal,
    pub paid: Decimal,
    pub remaining: Decimal,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualTaxSummary {
    pub estimated_income: Decimal,
    pub estimated_tax: Decimal,
    pub effective_rate: Decimal,
    pub deductions: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxEstimate {
    pub year: i32,
    pub annual: AnnualTaxSummary,
    pub quarterly: Vec<QuarterlyPayment>,
    pub set_aside: Decimal,
    pub set_aside_progress: Decimal,
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn profile_defaults_and_bounds() {
        let profile: TaxProfile = serde_json::from_value(json!({"id": "p1"})).unwrap();
        assert_eq!(profile.tax_rate, dec!(0.25));
        assert!(profile.is_stored());
        assert!(!TaxProfile::default().is_stored());

        let too_high = TaxProfile {
            tax_rate: dec!(1.2),
            ..TaxProfile::default()
        };
        assert!(too_high.validate().is_err());
        let merged = TaxProfile::default().merged(&TaxProfileUpdate {
            deductions: Some(dec!(-1)),
            ..Default::default()
        });
        assert!(merged.validate().is_err());
    }

    #[test]
    fn payment_quarter_range() {
        let payment = |quarter| NewTaxPayment {
            user_id: None,
            year: 2024,
            quarter,
            paid: dec!(100),
        };
        assert!(payment(0).validate().is_err());
        assert!(payment(5).validate().is_err());
        assert!(payment(4).validate().is_ok());
    }
}
