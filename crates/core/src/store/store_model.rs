use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

/// Entity collections held by the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Transactions,
    SavingsGoals,
    TaxPayments,
    TaxProfiles,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Transactions,
        Collection::SavingsGoals,
        Collection::TaxPayments,
        Collection::TaxProfiles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Transactions => "transactions",
            Collection::SavingsGoals => "savings_goals",
            Collection::TaxPayments => "tax_payments",
            Collection::TaxProfiles => "tax_profiles",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equality filter on a top-level record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortOrder {
    pub field: String,
    pub ascending: bool,
}

/// Filters and ordering for [`DataStore::list`](super::DataStore::list).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    pub filters: Vec<Filter>,
    pub order: Option<SortOrder>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, field: &str, ascending: bool) -> Self {
        self.order = Some(SortOrder {
            field: field.to_string(),
            ascending,
        });
        self
    }

    /// Whether a record passes every filter. Missing fields never match.
    pub fn matches(&self, record: &Value) -> bool {
        self.filters
            .iter()
            .all(|filter| record.get(&filter.field) == Some(&filter.value))
    }

    /// Stable in-place sort by the configured order, if any.
    pub fn sort(&self, records: &mut [Value]) {
        if let Some(order) = &self.order {
            records.sort_by(|a, b| {
                let ordering = compare_values(a.get(&order.field), b.get(&order.field));
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }
    }
}

/// Total order over optional JSON scalars used for sorting.
///
/// Absent and null sort first, then booleans, numbers, strings. ISO dates
/// compare correctly as strings.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Object(_)) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
