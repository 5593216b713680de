//! Property-based integration tests for insights and tax estimates.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashSet;

use gigledger_core::dashboard::build_dashboard;
use gigledger_core::formatters::DisplaySettings;
use gigledger_core::insights::{build_insights, peak_earning_days, savings_rate};
use gigledger_core::tax::{build_tax_estimate, TaxPayment, TaxProfile};
use gigledger_core::transactions::{Transaction, TransactionType};

// =============================================================================
// Generators
// =============================================================================

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, 20).unwrap()
}

fn arb_transaction_type() -> impl Strategy<Value = TransactionType> {
    prop_oneof![Just(TransactionType::Income), Just(TransactionType::Expense)]
}

/// Transactions spread over the two years before `today()`.
fn arb_transaction() -> impl Strategy<Value = Transaction> {
    (
        arb_transaction_type(),
        1i64..500_000,                                   // amount in cents
        0i64..730,                                       // days before today
        proptest::option::of("(Fuel|Equipment|Food)"),   // category
    )
        .prop_map(|(kind, cents, days_ago, category)| Transaction {
            id: format!("t{}{}", cents, days_ago),
            user_id: Some("user-1".into()),
            transaction_type: kind,
            amount: Decimal::new(cents, 2),
            category,
            platform: None,
            date: today() - Duration::days(days_ago),
            description: String::new(),
            recurring: false,
            created_at: None,
        })
}

fn arb_transactions(max_count: usize) -> impl Strategy<Value = Vec<Transaction>> {
    proptest::collection::vec(arb_transaction(), 0..=max_count)
}

fn arb_payments(year: i32) -> impl Strategy<Value = Vec<TaxPayment>> {
    proptest::collection::vec((1u8..=4, 0i64..200_000), 0..=4).prop_map(move |rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (quarter, cents))| TaxPayment {
                id: format!("p{}", i),
                user_id: None,
                year,
                quarter,
                paid: Decimal::new(cents, 2),
            })
            .collect()
    })
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Savings rate is a percentage and the health score never exceeds 100.
    #[test]
    fn prop_scores_stay_in_range(transactions in arb_transactions(40)) {
        let rate = savings_rate(&transactions);
        prop_assert!(rate >= Decimal::ZERO && rate <= Decimal::from(100));

        let estimate = build_tax_estimate(&transactions, &TaxProfile::default(), &[], 2024, today());
        let insights = build_insights(&transactions, &estimate, today());
        prop_assert!(insights.financial_health.score <= 100);
        prop_assert!(!insights.financial_health.label.is_empty());
    }

    /// Peak days are distinct weekdays that actually had income.
    #[test]
    fn prop_peak_days_are_distinct(transactions in arb_transactions(40)) {
        let days = peak_earning_days(&transactions);
        let unique: HashSet<_> = days.iter().collect();
        prop_assert_eq!(unique.len(), days.len());
        if !transactions.iter().any(|t| t.is_income()) {
            prop_assert!(days.is_empty());
        }
    }

    /// A past year has four equal quarters that add up to the annual tax.
    #[test]
    fn prop_quarters_cover_annual_tax(
        transactions in arb_transactions(40),
        payments in arb_payments(2023),
    ) {
        let estimate = build_tax_estimate(&transactions, &TaxProfile::default(), &payments, 2023, today());
        prop_assert_eq!(estimate.quarterly.len(), 4);

        let amount = estimate.quarterly[0].amount;
        let total: Decimal = estimate.quarterly.iter().map(|q| q.amount).sum();
        prop_assert!((total - estimate.annual.estimated_tax).abs() <= Decimal::new(2, 2));
        for quarter in &estimate.quarterly {
            prop_assert_eq!(quarter.amount, amount);
            prop_assert!(quarter.remaining >= Decimal::ZERO);
            prop_assert_eq!(quarter.remaining, (quarter.amount - quarter.paid).max(Decimal::ZERO));
        }
    }

    /// Dashboard totals agree with each other.
    #[test]
    fn prop_dashboard_net_is_income_minus_expenses(transactions in arb_transactions(40)) {
        let summary = build_dashboard(None, &transactions, &[], &DisplaySettings::default(), today());
        prop_assert_eq!(summary.net_income, summary.total_income - summary.total_expenses);
        prop_assert!(summary.recent_transactions.len() <= 5);
        prop_assert_eq!(summary.greeting_name.as_str(), "User");
    }
}
