//! Derived income insights and the financial health score.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use num_traits::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt;

use crate::calculations::{
    aggregate_by_date, average_daily_income, category_totals, generate_date_range, net_income,
    total_income,
};
use crate::constants::DEFAULT_WINDOW_DAYS;
use crate::tax::TaxEstimate;
use crate::transactions::Transaction;

const PEAK_DAY_COUNT: usize = 3;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IncomeStability {
    High,
    Moderate,
    Low,
}

impl IncomeStability {
    /// Classifies a coefficient of variation of daily income.
    pub fn from_variation(coefficient: Decimal) -> Self {
        if coefficient < dec!(0.5) {
            IncomeStability::High
        } else if coefficient < Decimal::ONE {
            IncomeStability::Moderate
        } else {
            IncomeStability::Low
        }
    }

    fn points(&self) -> u32 {
        match self {
            IncomeStability::High => 30,
            IncomeStability::Moderate => 20,
            IncomeStability::Low => 10,
        }
    }
}

impl fmt::Display for IncomeStability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IncomeStability::High => "High",
            IncomeStability::Moderate => "Moderate",
            IncomeStability::Low => "Low",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScore {
    pub score: u32,
    pub label: String,
}

impl HealthScore {
    pub fn new(score: u32) -> Self {
        let score = score.min(100);
        let label = if score >= 80 {
            "Excellent"
        } else if score >= 60 {
            "Good"
        } else if score >= 40 {
            "Fair"
        } else {
            "Needs Attention"
        };
        HealthScore {
            score,
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub average_daily_income: Decimal,
    pub income_stability: IncomeStability,
    pub savings_rate: Decimal,
    pub top_expense_category: Option<String>,
    pub peak_earning_days: Vec<String>,
    pub financial_health: HealthScore,
    pub recommendations: Vec<String>,
}

/// Coefficient of variation of daily income over the window ending `today`.
/// `None` when there was no income at all.
pub fn income_variation(transactions: &[Transaction], today: NaiveDate) -> Option<Decimal> {
    let dates = generate_date_range(DEFAULT_WINDOW_DAYS, today);
    let daily: Vec<Decimal> = aggregate_by_date(transactions, &dates)
        .into_iter()
        .map(|d| d.income)
        .collect();
    if daily.is_empty() {
        return None;
    }
    let count = Decimal::from(daily.len());
    let mean = daily.iter().sum::<Decimal>() / count;
    if mean.is_zero() {
        return None;
    }
    let variance = daily.iter().map(|x| (*x - mean) * (*x - mean)).sum::<Decimal>() / count;
    let deviation = variance.sqrt()?;
    Some(deviation / mean)
}

/// Net over income as a percentage, clamped to 0..=100.
pub fn savings_rate(transactions: &[Transaction]) -> Decimal {
    let income = total_income(transactions);
    if income.is_zero() {
        return Decimal::ZERO;
    }
    (net_income(transactions) / income * dec!(100))
        .clamp(Decimal::ZERO, dec!(100))
        .round_dp(1)
}

/// Weekdays with the most income, best first. Days without income are left out.
pub fn peak_earning_days(transactions: &[Transaction]) -> Vec<Weekday> {
    let mut totals = [Decimal::ZERO; 7];
    for t in transactions.iter().filter(|t| t.is_income()) {
        totals[t.date.weekday().num_days_from_monday() as usize] += t.amount;
    }
    let mut days: Vec<(Weekday, Decimal)> = WEEK
        .iter()
        .copied()
        .map(|day| (day, totals[day.num_days_from_monday() as usize]))
        .filter(|(_, total)| *total > Decimal::ZERO)
        .collect();
    days.sort_by(|a, b| b.1.cmp(&a.1));
    days.into_iter()
        .take(PEAK_DAY_COUNT)
        .map(|(day, _)| day)
        .collect()
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Savings up to 40, stability 30/20/10, positive net 20, tax coverage up to 10.
pub fn health_score(
    savings_rate: Decimal,
    stability: IncomeStability,
    net: Decimal,
    tax_coverage: Decimal,
) -> HealthScore {
    let savings_points = (savings_rate * dec!(2)).clamp(Decimal::ZERO, dec!(40));
    let net_points = if net > Decimal::ZERO { dec!(20) } else { Decimal::ZERO };
    let tax_points = (tax_coverage / dec!(10)).clamp(Decimal::ZERO, dec!(10));
    let total = savings_points + Decimal::from(stability.points()) + net_points + tax_points;
    HealthScore::new(total.floor().to_u32().unwrap_or(0))
}

pub fn build_insights(
    transactions: &[Transaction],
    estimate: &TaxEstimate,
    today: NaiveDate,
) -> Insights {
    let window_start = today - Duration::days(i64::from(DEFAULT_WINDOW_DAYS) - 1);
    let recent: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.date >= window_start && t.date <= today)
        .cloned()
        .collect();

    let stability = income_variation(transactions, today)
        .map_or(IncomeStability::Low, IncomeStability::from_variation);
    let rate = savings_rate(transactions);
    let expenses: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.is_expense())
        .cloned()
        .collect();
    let top_expense_category = category_totals(&expenses)
        .into_iter()
        .next()
        .map(|c| c.category);
    let peak_days = peak_earning_days(transactions);

    let tax_coverage = if estimate.annual.estimated_tax.is_zero() {
        dec!(100)
    } else {
        estimate.set_aside_progress
    };
    let financial_health = health_score(rate, stability, net_income(transactions), tax_coverage);

    let recommendations = recommendations(
        &peak_days,
        top_expense_category.as_deref(),
        rate,
        stability,
        tax_coverage,
        total_income(transactions),
    );

    Insights {
        average_daily_income: average_daily_income(&recent, DEFAULT_WINDOW_DAYS).round_dp(2),
        income_stability: stability,
        savings_rate: rate,
        top_expense_category,
        peak_earning_days: peak_days.iter().map(|d| weekday_name(*d).to_string()).collect(),
        financial_health,
        recommendations,
    }
}

fn recommendations(
    peak_days: &[Weekday],
    top_expense: Option<&str>,
    savings_rate: Decimal,
    stability: IncomeStability,
    tax_coverage: Decimal,
    income: Decimal,
) -> Vec<String> {
    let mut tips = Vec::new();

    if peak_days
        .first()
        .is_some_and(|d| matches!(d, Weekday::Fri | Weekday::Sat | Weekday::Sun))
    {
        tips.push(
            "Your income is highest on weekends. Consider working more hours Friday-Sunday."
                .to_string(),
        );
    } else if let Some(day) = peak_days.first() {
        tips.push(format!(
            "Your income is highest on {}s. Consider scheduling more work then.",
            weekday_name(*day)
        ));
    }

    if let Some(category) = top_expense {
        let lower = category.to_lowercase();
        if lower.contains("gas") || lower.contains("mileage") {
            tips.push(format!("{} expenses are high. Track mileage for tax deductions.", category));
        } else {
            tips.push(format!(
                "{} is your largest expense. Review it for possible savings.",
                category
            ));
        }
    }

    if income > Decimal::ZERO {
        if savings_rate >= dec!(25) {
            tips.push(format!(
                "You're saving {}% of income - great job!",
                savings_rate.normalize()
            ));
        } else if savings_rate > Decimal::ZERO {
            tips.push(format!(
                "You're saving {}% of income - great job! Try to increase to 25%.",
                savings_rate.normalize()
            ));
        } else {
            tips.push(
                "Your expenses match or exceed your income. Review recurring costs.".to_string(),
            );
        }
    }

    if stability == IncomeStability::Low && income > Decimal::ZERO {
        tips.push(
            "Your daily income varies a lot. Build an emergency fund for slow weeks.".to_string(),
        );
    }

    if tax_coverage < dec!(100) {
        tips.push("Consider setting aside 30% for taxes to avoid year-end surprises.".to_string());
    }
    tips
}
