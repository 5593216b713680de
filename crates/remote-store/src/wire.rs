//! Key casing and query-string encoding for the REST data API.

use gigledger_core::store::{Collection, ListQuery};
use serde_json::{Map, Value};

pub fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

pub fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.chars() {
        if c == '_' && !out.is_empty() {
            upper_next = true;
        } else if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn rename_keys(value: Value, rename: fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (rename(&key), value))
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}

/// Domain record -> wire row. Only top-level keys are renamed.
pub fn to_wire(record: Value) -> Value {
    rename_keys(record, to_snake_case)
}

/// Wire row -> domain record.
pub fn from_wire(row: Value) -> Value {
    rename_keys(row, to_camel_case)
}

fn filter_literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// `{base}/rest/v1/{table}?select=*&{col}=eq.{v}&order={col}.{asc|desc}`
pub fn list_url(base_url: &str, collection: Collection, query: &ListQuery) -> String {
    let mut url = format!("{}/rest/v1/{}?select=*", base_url, collection.as_str());
    for filter in &query.filters {
        url.push_str(&format!(
            "&{}=eq.{}",
            to_snake_case(&filter.field),
            urlencoding::encode(&filter_literal(&filter.value))
        ));
    }
    if let Some(order) = &query.order {
        let direction = if order.ascending { "asc" } else { "desc" };
        url.push_str(&format!("&order={}.{}", to_snake_case(&order.field), direction));
    }
    url
}

/// `{base}/rest/v1/{table}?id=eq.{id}` for single-row writes.
pub fn row_url(base_url: &str, collection: Collection, id: &str) -> String {
    format!(
        "{}/rest/v1/{}?id=eq.{}",
        base_url,
        collection.as_str(),
        urlencoding::encode(id)
    )
}

pub fn table_url(base_url: &str, collection: Collection) -> String {
    format!("{}/rest/v1/{}", base_url, collection.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn casing_round_trips_domain_keys() {
        for key in ["userId", "createdAt", "setAside", "taxRate", "type", "id"] {
            assert_eq!(to_camel_case(&to_snake_case(key)), key);
        }
        assert_eq!(to_snake_case("userId"), "user_id");
        assert_eq!(to_camel_case("set_aside"), "setAside");
    }

    #[test]
    fn converts_top_level_keys_only() {
        let wire = to_wire(json!({"userId": "u1", "amount": 5, "meta": {"fullName": "A"}}));
        assert_eq!(wire, json!({"user_id": "u1", "amount": 5, "meta": {"fullName": "A"}}));
        let domain = from_wire(json!({"created_at": "2024-11-28T00:00:00Z", "tax_rate": 0.25}));
        assert_eq!(domain, json!({"createdAt": "2024-11-28T00:00:00Z", "taxRate": 0.25}));
    }

    #[test]
    fn builds_list_urls() {
        let query = ListQuery::new()
            .eq("userId", "a b")
            .eq("year", 2024)
            .order_by("date", false);
        assert_eq!(
            list_url("https://x.example.co", Collection::Transactions, &query),
            "https://x.example.co/rest/v1/transactions?select=*&user_id=eq.a%20b&year=eq.2024&order=date.desc"
        );
        assert_eq!(
            row_url("https://x.example.co", Collection::SavingsGoals, "42"),
            "https://x.example.co/rest/v1/savings_goals?id=eq.42"
        );
    }
}
