//! Pure reducers over in-memory transaction lists.
//!
//! None of these fail: out-of-range input is clamped or special-cased.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_TAX_RATE, OTHER_PLATFORM};
use crate::transactions::{Transaction, TransactionType};
use crate::utils::{div_ceil_i64, get_days_between, start_of_day_utc};

const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformTotal {
    pub platform: String,
    pub total: Decimal,
}

/// Income and expense sums for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub income: Decimal,
    pub expenses: Decimal,
}

/// Inputs of the self-employment tax estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxOptions {
    pub tax_rate: Decimal,
    pub deductions: Decimal,
}

impl Default for TaxOptions {
    fn default() -> Self {
        TaxOptions {
            tax_rate: DEFAULT_TAX_RATE,
            deductions: Decimal::ZERO,
        }
    }
}

pub fn total_by_type(transactions: &[Transaction], transaction_type: TransactionType) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.transaction_type == transaction_type)
        .map(|t| t.amount)
        .sum()
}

pub fn total_income(transactions: &[Transaction]) -> Decimal {
    total_by_type(transactions, TransactionType::Income)
}

pub fn total_expenses(transactions: &[Transaction]) -> Decimal {
    total_by_type(transactions, TransactionType::Expense)
}

pub fn net_income(transactions: &[Transaction]) -> Decimal {
    total_income(transactions) - total_expenses(transactions)
}

/// Partitions transactions by category label, keeping first-seen order.
pub fn group_by_category(transactions: &[Transaction]) -> Vec<(String, Vec<&Transaction>)> {
    let mut groups: Vec<(String, Vec<&Transaction>)> = Vec::new();
    for transaction in transactions {
        let label = transaction.category_label();
        match groups.iter_mut().find(|(category, _)| category == label) {
            Some((_, members)) => members.push(transaction),
            None => groups.push((label.to_string(), vec![transaction])),
        }
    }
    groups
}

/// Per-category totals, largest first. Ties keep first-seen order.
pub fn category_totals(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = group_by_category(transactions)
        .into_iter()
        .map(|(category, members)| CategoryTotal {
            category,
            total: members.iter().map(|t| t.amount).sum(),
            count: members.len(),
        })
        .collect();
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals
}

/// Percentage of `target` reached, capped at 100. Zero target gives 0.
pub fn savings_progress(current: Decimal, target: Decimal) -> Decimal {
    if target.is_zero() {
        return Decimal::ZERO;
    }
    (current / target * dec!(100)).min(dec!(100))
}

/// Whole days until `deadline` (midnight UTC), rounded up.
pub fn days_until_at(deadline: NaiveDate, now: DateTime<Utc>) -> i64 {
    let remaining = start_of_day_utc(deadline) - now;
    div_ceil_i64(remaining.num_milliseconds(), MILLIS_PER_DAY)
}

pub fn days_until(deadline: NaiveDate) -> i64 {
    days_until_at(deadline, Utc::now())
}

pub fn estimate_quarterly_tax(income: Decimal, options: &TaxOptions) -> Decimal {
    let taxable = (income - options.deductions).max(Decimal::ZERO);
    taxable * options.tax_rate
}

pub fn average_daily_income(transactions: &[Transaction], days: u32) -> Decimal {
    if days == 0 {
        return Decimal::ZERO;
    }
    total_income(transactions) / Decimal::from(days)
}

/// Percentage change from `previous` to `current`.
pub fn income_trend(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return if current > Decimal::ZERO {
            dec!(100)
        } else {
            Decimal::ZERO
        };
    }
    (current - previous) / previous * dec!(100)
}

pub fn income_by_platform(transactions: &[Transaction]) -> Vec<PlatformTotal> {
    let mut totals: Vec<PlatformTotal> = Vec::new();
    for transaction in transactions.iter().filter(|t| t.is_income()) {
        let platform = transaction.platform_label().unwrap_or(OTHER_PLATFORM);
        match totals.iter_mut().find(|p| p.platform == platform) {
            Some(entry) => entry.total += transaction.amount,
            None => totals.push(PlatformTotal {
                platform: platform.to_string(),
                total: transaction.amount,
            }),
        }
    }
    totals
}

pub fn recurring_expenses(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.is_expense() && t.recurring)
        .map(|t| t.amount)
        .sum()
}

/// The `days` calendar dates ending at `today`, oldest first.
pub fn generate_date_range(days: u32, today: NaiveDate) -> Vec<NaiveDate> {
    if days == 0 {
        return Vec::new();
    }
    let start = today - Duration::days(i64::from(days) - 1);
    get_days_between(start, today)
}

pub fn aggregate_by_date(transactions: &[Transaction], dates: &[NaiveDate]) -> Vec<DailyTotals> {
    dates
        .iter()
        .map(|&date| {
            let (income, expenses) = transactions
                .iter()
                .filter(|t| t.date == date)
                .fold((Decimal::ZERO, Decimal::ZERO), |(income, expenses), t| {
                    match t.transaction_type {
                        TransactionType::Income => (income + t.amount, expenses),
                        TransactionType::Expense => (income, expenses + t.amount),
                    }
                });
            DailyTotals {
                date,
                income,
                expenses,
            }
        })
        .collect()
}

/// Whole-number percentage of `total`; 0 when total is 0.
pub fn share_of_total(amount: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    (amount / total * dec!(100)).round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn tx(kind: TransactionType, amount: Decimal, category: Option<&str>) -> Transaction {
        Transaction {
            id: "t".into(),
            user_id: None,
            transaction_type: kind,
            amount,
            category: category.map(str::to_string),
            platform: None,
            date: NaiveDate::from_ymd_opt(2024, 11, 20).unwrap(),
            description: String::new(),
            recurring: false,
            created_at: None,
        }
    }

    fn expense(category: &str, amount: Decimal) -> Transaction {
        tx(TransactionType::Expense, amount, Some(category))
    }

    #[test]
    fn empty_totals_are_zero() {
        assert_eq!(total_by_type(&[], TransactionType::Income), Decimal::ZERO);
        assert_eq!(total_by_type(&[], TransactionType::Expense), Decimal::ZERO);
        assert_eq!(net_income(&[]), Decimal::ZERO);
    }

    #[test]
    fn category_totals_sum_and_order() {
        let transactions = vec![
            expense("Gas", dec!(10)),
            expense("Gas", dec!(5)),
            expense("Food", dec!(3)),
        ];
        let totals = category_totals(&transactions);
        assert_eq!(
            totals,
            vec![
                CategoryTotal {
                    category: "Gas".into(),
                    total: dec!(15),
                    count: 2
                },
                CategoryTotal {
                    category: "Food".into(),
                    total: dec!(3),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn category_totals_keep_tie_order() {
        let transactions = vec![
            expense("Phone", dec!(4)),
            tx(TransactionType::Expense, dec!(4), None),
            expense("Gas", dec!(9)),
        ];
        let names: Vec<_> = category_totals(&transactions)
            .into_iter()
            .map(|c| c.category)
            .collect();
        assert_eq!(names, vec!["Gas", "Phone", "Uncategorized"]);
    }

    #[test]
    fn savings_progress_clamps() {
        assert_eq!(savings_progress(dec!(50), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(savings_progress(dec!(50), dec!(100)), dec!(50));
        assert_eq!(savings_progress(dec!(150), dec!(100)), dec!(100));
    }

    #[test]
    fn days_until_rounds_up() {
        let now = Utc.with_ymd_and_hms(2024, 11, 20, 15, 30, 0).unwrap();
        let today = now.date_naive();
        assert_eq!(days_until_at(today, now), 0);
        assert_eq!(days_until_at(today.succ_opt().unwrap(), now), 1);
        assert!(days_until_at(today.pred_opt().unwrap(), now) < 0);

        let midnight = Utc.with_ymd_and_hms(2024, 11, 20, 0, 0, 0).unwrap();
        assert_eq!(days_until_at(today, midnight), 0);
        assert_eq!(days_until_at(today.succ_opt().unwrap(), midnight), 1);
    }

    #[test]
    fn quarterly_tax_applies_deductions() {
        let options = TaxOptions {
            tax_rate: dec!(0.25),
            deductions: dec!(2000),
        };
        assert_eq!(estimate_quarterly_tax(dec!(10000), &options), dec!(2000));
        assert_eq!(
            estimate_quarterly_tax(dec!(1000), &options),
            Decimal::ZERO
        );
        assert_eq!(
            estimate_quarterly_tax(dec!(400), &TaxOptions::default()),
            dec!(100)
        );
    }

    #[test]
    fn trend_handles_zero_baseline() {
        assert_eq!(income_trend(dec!(10), Decimal::ZERO), dec!(100));
        assert_eq!(income_trend(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
        assert_eq!(income_trend(dec!(150), dec!(100)), dec!(50));
        assert_eq!(income_trend(dec!(50), dec!(100)), dec!(-50));
    }

    #[test]
    fn average_daily_income_guards_zero_days() {
        let income = vec![tx(TransactionType::Income, dec!(300), None)];
        assert_eq!(average_daily_income(&income, 30), dec!(10));
        assert_eq!(average_daily_income(&income, 0), Decimal::ZERO);
    }

    #[test]
    fn platform_totals_default_to_other() {
        let mut uber = tx(TransactionType::Income, dec!(20), None);
        uber.platform = Some("Uber".into());
        let unnamed = tx(TransactionType::Income, dec!(5), None);
        let spend = expense("Gas", dec!(7));
        let totals = income_by_platform(&[uber.clone(), unnamed, uber, spend]);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].platform, "Uber");
        assert_eq!(totals[0].total, dec!(40));
        assert_eq!(totals[1].platform, "Other");
    }

    #[test]
    fn recurring_only_counts_expenses() {
        let mut rent = expense("Phone", dec!(60));
        rent.recurring = true;
        let mut odd = tx(TransactionType::Income, dec!(10), None);
        odd.recurring = true;
        assert_eq!(recurring_expenses(&[rent, odd, expense("Gas", dec!(1))]), dec!(60));
    }

    #[test]
    fn date_range_ends_today() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let range = generate_date_range(3, today);
        assert_eq!(
            range,
            vec![
                NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                today,
            ]
        );
        assert!(generate_date_range(0, today).is_empty());
    }

    #[test]
    fn aggregate_by_date_splits_types() {
        let day = NaiveDate::from_ymd_opt(2024, 11, 20).unwrap();
        let other = NaiveDate::from_ymd_opt(2024, 11, 21).unwrap();
        let transactions = vec![
            tx(TransactionType::Income, dec!(30), None),
            expense("Gas", dec!(12)),
        ];
        let daily = aggregate_by_date(&transactions, &[day, other]);
        assert_eq!(daily[0].income, dec!(30));
        assert_eq!(daily[0].expenses, dec!(12));
        assert_eq!(daily[1].income, Decimal::ZERO);
    }

    #[test]
    fn share_rounds_to_whole_percent() {
        assert_eq!(share_of_total(dec!(1), dec!(3)), dec!(33));
        assert_eq!(share_of_total(dec!(2), dec!(3)), dec!(67));
        assert_eq!(share_of_total(dec!(5), Decimal::ZERO), Decimal::ZERO);
    }

    fn arb_transaction() -> impl Strategy<Value = Transaction> {
        (any::<bool>(), 0i64..1_000_000, 0usize..4).prop_map(|(income, cents, category)| {
            let kind = if income {
                TransactionType::Income
            } else {
                TransactionType::Expense
            };
            let categories = ["Gas", "Food", "Phone", ""];
            tx(kind, Decimal::new(cents, 2), Some(categories[category]))
        })
    }

    proptest! {
        #[test]
        fn totals_partition_the_list(transactions in prop::collection::vec(arb_transaction(), 0..40)) {
            let all: Decimal = transactions.iter().map(|t| t.amount).sum();
            prop_assert_eq!(total_income(&transactions) + total_expenses(&transactions), all);
            prop_assert_eq!(
                net_income(&transactions),
                total_income(&transactions) - total_expenses(&transactions)
            );
        }

        #[test]
        fn category_totals_are_sorted_and_complete(transactions in prop::collection::vec(arb_transaction(), 0..40)) {
            let totals = category_totals(&transactions);
            let count: usize = totals.iter().map(|c| c.count).sum();
            let sum: Decimal = totals.iter().map(|c| c.total).sum();
            prop_assert_eq!(count, transactions.len());
            prop_assert_eq!(sum, transactions.iter().map(|t| t.amount).sum::<Decimal>());
            prop_assert!(totals.windows(2).all(|w| w[0].total >= w[1].total));
        }

        #[test]
        fn savings_progress_stays_in_range(current in 0i64..10_000_000, target in 1i64..10_000_000) {
            let progress = savings_progress(Decimal::new(current, 2), Decimal::new(target, 2));
            prop_assert!(progress >= Decimal::ZERO);
            prop_assert!(progress <= dec!(100));
        }
    }
}
