//! Dashboard view model built from the session's cached records.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::auth::User;
use crate::calculations::{
    category_totals, income_trend, net_income, share_of_total, total_expenses, total_income,
};
use crate::constants::{
    CHART_PALETTE, DASHBOARD_TAX_SET_ASIDE_RATE, DEFAULT_WINDOW_DAYS, OTHER_PLATFORM,
    RECENT_TRANSACTIONS_LIMIT,
};
use crate::formatters::DisplaySettings;
use crate::goals::SavingsGoal;
use crate::styles::Tone;
use crate::transactions::Transaction;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCard {
    pub title: String,
    pub value: Decimal,
    pub formatted: String,
    /// Percent change against the previous window, when meaningful.
    pub change: Option<Decimal>,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub income: Decimal,
}

/// One slice of a donut chart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSlice {
    pub label: String,
    pub amount: Decimal,
    pub percentage: Decimal,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub greeting_name: String,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_income: Decimal,
    pub tax_set_aside: Decimal,
    pub savings_total: Decimal,
    pub income_change: Decimal,
    pub expense_change: Decimal,
    pub stats: Vec<StatCard>,
    pub income_trend: Vec<TrendPoint>,
    pub income_by_platform: Vec<ChartSlice>,
    pub expense_breakdown: Vec<ChartSlice>,
    pub recent_transactions: Vec<Transaction>,
}

pub fn build_dashboard(
    user: Option<&User>,
    transactions: &[Transaction],
    goals: &[SavingsGoal],
    display: &DisplaySettings,
    today: NaiveDate,
) -> DashboardSummary {
    let income = total_income(transactions);
    let expenses = total_expenses(transactions);
    let net = net_income(transactions);
    let tax_set_aside = income * DASHBOARD_TAX_SET_ASIDE_RATE;
    let savings_total: Decimal = goals.iter().map(|g| g.current).sum();

    let window = i64::from(DEFAULT_WINDOW_DAYS);
    let current_start = today - Duration::days(window - 1);
    let previous_start = current_start - Duration::days(window);
    let current: Vec<Transaction> = in_range(transactions, current_start, today);
    let previous: Vec<Transaction> =
        in_range(transactions, previous_start, current_start - Duration::days(1));
    let income_change = income_trend(total_income(&current), total_income(&previous)).round_dp(1);
    let expense_change =
        income_trend(total_expenses(&current), total_expenses(&previous)).round_dp(1);

    let card = |title: &str, value: Decimal, change: Option<Decimal>, tone: Tone| StatCard {
        title: title.to_string(),
        value,
        formatted: display.currency(value),
        change,
        tone,
    };
    let stats = vec![
        card("Total Income", income, Some(income_change), Tone::Success),
        card("Total Expenses", expenses, Some(expense_change), Tone::Danger),
        card("Net Income", net, None, Tone::Primary),
        card("Tax Set Aside", tax_set_aside, None, Tone::Warning),
    ];

    let mut recent = transactions.to_vec();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(RECENT_TRANSACTIONS_LIMIT);

    DashboardSummary {
        greeting_name: user.map_or("User", User::first_name).to_string(),
        total_income: income,
        total_expenses: expenses,
        net_income: net,
        tax_set_aside,
        savings_total,
        income_change,
        expense_change,
        stats,
        income_trend: daily_income_trend(transactions),
        income_by_platform: income_sources(transactions, income),
        expense_breakdown: expense_breakdown(transactions, expenses),
        recent_transactions: recent,
    }
}

fn in_range(transactions: &[Transaction], start: NaiveDate, end: NaiveDate) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.date >= start && t.date <= end)
        .cloned()
        .collect()
}

/// Income per dated entry, oldest first, limited to the last 30 dates with income.
fn daily_income_trend(transactions: &[Transaction]) -> Vec<TrendPoint> {
    let mut by_date: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for t in transactions.iter().filter(|t| t.is_income()) {
        *by_date.entry(t.date).or_default() += t.amount;
    }
    let skip = by_date.len().saturating_sub(DEFAULT_WINDOW_DAYS as usize);
    by_date
        .into_iter()
        .skip(skip)
        .map(|(date, income)| TrendPoint { date, income })
        .collect()
}

/// Income grouped by platform, else category, else "Other".
fn income_sources(transactions: &[Transaction], total: Decimal) -> Vec<ChartSlice> {
    let mut sources: Vec<(String, Decimal)> = Vec::new();
    for t in transactions.iter().filter(|t| t.is_income()) {
        let label = t
            .platform_label()
            .or_else(|| t.category.as_deref().map(str::trim).filter(|c| !c.is_empty()))
            .unwrap_or(OTHER_PLATFORM);
        match sources.iter_mut().find(|(name, _)| name == label) {
            Some((_, amount)) => *amount += t.amount,
            None => sources.push((label.to_string(), t.amount)),
        }
    }
    slices(sources, total)
}

fn expense_breakdown(transactions: &[Transaction], total: Decimal) -> Vec<ChartSlice> {
    let expenses: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.is_expense())
        .cloned()
        .collect();
    let totals = category_totals(&expenses)
        .into_iter()
        .map(|c| (c.category, c.total))
        .collect();
    slices(totals, total)
}

fn slices(entries: Vec<(String, Decimal)>, total: Decimal) -> Vec<ChartSlice> {
    entries
        .into_iter()
        .enumerate()
        .map(|(i, (label, amount))| ChartSlice {
            label,
            amount,
            percentage: share_of_total(amount, total),
            color: CHART_PALETTE[i % CHART_PALETTE.len()].to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::TransactionType;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn ymd(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn tx(
        kind: TransactionType,
        amount: Decimal,
        date: NaiveDate,
        category: Option<&str>,
        platform: Option<&str>,
    ) -> Transaction {
        Transaction {
            id: format!("{}-{}", date, amount),
            user_id: None,
            transaction_type: kind,
            amount,
            category: category.map(str::to_string),
            platform: platform.map(str::to_string),
            date,
            description: String::new(),
            recurring: false,
            created_at: None,
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx(TransactionType::Income, dec!(300), ymd(11, 28), Some("Rideshare"), Some("Uber")),
            tx(TransactionType::Income, dec!(100), ymd(11, 27), Some("Freelance"), None),
            tx(TransactionType::Expense, dec!(60), ymd(11, 26), Some("Gas"), None),
            tx(TransactionType::Expense, dec!(40), ymd(11, 25), Some("Food"), None),
            tx(TransactionType::Income, dec!(200), ymd(10, 20), None, None),
            tx(TransactionType::Expense, dec!(50), ymd(10, 15), Some("Gas"), None),
        ]
    }

    #[test]
    fn headline_figures() {
        let user = User {
            id: "u".into(),
            email: "alex@example.com".into(),
            full_name: Some("Alex Rivera".into()),
            created_at: Utc::now(),
        };
        let summary = build_dashboard(
            Some(&user),
            &sample(),
            &[],
            &DisplaySettings::default(),
            ymd(11, 30),
        );
        assert_eq!(summary.greeting_name, "Alex");
        assert_eq!(summary.total_income, dec!(600));
        assert_eq!(summary.total_expenses, dec!(150));
        assert_eq!(summary.net_income, dec!(450));
        assert_eq!(summary.tax_set_aside, dec!(150));
        // Nov 1..=30 against Oct 2..=31
        assert_eq!(summary.income_change, dec!(100));
        assert_eq!(summary.expense_change, dec!(100));
        assert_eq!(summary.stats[0].formatted, "$600.00");
        assert_eq!(summary.recent_transactions.len(), 5);
        assert_eq!(summary.recent_transactions[0].date, ymd(11, 28));
    }

    #[test]
    fn chart_series() {
        let summary = build_dashboard(None, &sample(), &[], &DisplaySettings::default(), ymd(11, 30));
        assert_eq!(summary.greeting_name, "User");

        let sources: Vec<_> = summary
            .income_by_platform
            .iter()
            .map(|s| (s.label.as_str(), s.percentage))
            .collect();
        assert_eq!(
            sources,
            vec![("Uber", dec!(50)), ("Freelance", dec!(17)), ("Other", dec!(33))]
        );
        assert_eq!(summary.income_by_platform[1].color, CHART_PALETTE[1]);

        assert_eq!(summary.expense_breakdown[0].label, "Gas");
        assert_eq!(summary.expense_breakdown[0].amount, dec!(110));

        let trend_dates: Vec<_> = summary.income_trend.iter().map(|p| p.date).collect();
        assert_eq!(trend_dates, vec![ymd(10, 20), ymd(11, 27), ymd(11, 28)]);
    }
}
