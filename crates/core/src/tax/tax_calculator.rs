//! Derives the yearly estimate and quarterly schedule from raw records.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::tax_model::{
    AnnualTaxSummary, PaymentStatus, QuarterlyPayment, TaxEstimate, TaxPayment, TaxProfile,
};
use crate::calculations::{estimate_quarterly_tax, savings_progress};
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::transactions::Transaction;
use crate::utils::{days_in_year, is_same_year};

const VEHICLE_CATEGORIES: [&str; 4] = ["gas", "fuel", "maintenance", "mileage"];

/// Federal estimated-tax due date for `quarter` (1-4) of `year`.
pub fn quarter_due_date(year: i32, quarter: u8) -> Option<NaiveDate> {
    match quarter {
        1 => NaiveDate::from_ymd_opt(year, 4, 15),
        2 => NaiveDate::from_ymd_opt(year, 6, 15),
        3 => NaiveDate::from_ymd_opt(year, 9, 15),
        4 => NaiveDate::from_ymd_opt(year + 1, 1, 15),
        _ => None,
    }
}

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_DECIMAL_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

/// Income dated in `year`, annualized when `year` is still running.
fn estimated_income(transactions: &[Transaction], year: i32, today: NaiveDate) -> Decimal {
    let income: Decimal = transactions
        .iter()
        .filter(|t| t.is_income() && is_same_year(t.date, year))
        .map(|t| t.amount)
        .sum();

    if year != today.year() {
        return income;
    }
    let elapsed = Decimal::from(today.ordinal());
    income / elapsed * Decimal::from(days_in_year(year))
}

pub fn build_tax_estimate(
    transactions: &[Transaction],
    profile: &TaxProfile,
    payments: &[TaxPayment],
    year: i32,
    today: NaiveDate,
) -> TaxEstimate {
    let estimated_income = round_money(estimated_income(transactions, year, today));
    let estimated_tax = round_money(estimate_quarterly_tax(estimated_income, &profile.options()));
    let effective_rate = if estimated_income.is_zero() {
        Decimal::ZERO
    } else {
        round_money(estimated_tax / estimated_income * dec!(100))
    };
    let quarter_amount = round_money(estimated_tax / dec!(4));

    let quarterly: Vec<QuarterlyPayment> = (1..=4u8)
        .filter_map(|quarter| {
            let due = quarter_due_date(year, quarter)?;
            let paid: Decimal = payments
                .iter()
                .filter(|p| p.year == year && p.quarter == quarter)
                .map(|p| p.paid)
                .sum();
            let status = if paid >= quarter_amount {
                PaymentStatus::Paid
            } else if today > due {
                PaymentStatus::Overdue
            } else {
                PaymentStatus::Pending
            };
            Some(QuarterlyPayment {
                quarter: format!("Q{} {}", quarter, year),
                due,
                amount: quarter_amount,
                paid,
                remaining: (quarter_amount - paid).max(Decimal::ZERO),
                status,
            })
        })
        .collect();

    let recommendations = recommendations(transactions, profile, &quarterly, estimated_tax, year);

    TaxEstimate {
        year,
        annual: AnnualTaxSummary {
            estimated_income,
            estimated_tax,
            effective_rate,
            deductions: profile.deductions,
        },
        quarterly,
        set_aside: profile.set_aside,
        set_aside_progress: savings_progress(profile.set_aside, estimated_tax),
        recommendations,
    }
}

fn recommendations(
    transactions: &[Transaction],
    profile: &TaxProfile,
    quarterly: &[QuarterlyPayment],
    estimated_tax: Decimal,
    year: i32,
) -> Vec<String> {
    let mut tips = Vec::new();

    if quarterly.iter().any(|q| q.status == PaymentStatus::Overdue) {
        tips.push("Consider increasing quarterly payments to avoid penalties".to_string());
    }

    let expense_categories: Vec<String> = transactions
        .iter()
        .filter(|t| t.is_expense() && is_same_year(t.date, year))
        .map(|t| t.category_label().to_lowercase())
        .collect();
    if expense_categories
        .iter()
        .any(|c| VEHICLE_CATEGORIES.iter().any(|v| c.contains(v)))
    {
        tips.push("Track mileage for potential deductions".to_string());
    }
    if expense_categories.iter().any(|c| c.contains("equipment")) {
        tips.push("Keep receipts for equipment purchases".to_string());
    }

    if profile.set_aside < estimated_tax {
        tips.push("Set aside more income to cover your estimated tax".to_string());
    }

    if tips.is_empty() {
        tips.push("Review deductions with a tax professional".to_string());
    }
    tips
}
