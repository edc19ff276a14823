//! Rich-Query Selector
//!
//! The ledger's query engine understands field equality, `>=`, `<=` and
//! not-null, ANDed across fields and always scoped by the document's
//! `assetType` tag. No joins, no projections - callers that need more
//! fetch the collection and scan in memory.
//!
//! Every store backend evaluates selectors through [`Selector::matches`]
//! so memory and persistent backends cannot diverge.

use std::collections::BTreeMap;

use serde_json::Value;

/// One field condition
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the value
    Eq(Value),
    /// Field is greater than or equal to the value
    Gte(Value),
    /// Field is less than or equal to the value
    Lte(Value),
    /// Field is present and non-null
    NotNull,
}

/// ANDed field conditions. Fields not named are unconstrained - the
/// `assetType` scope applied by every store backend keeps a bare scan
/// well-formed on its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    fields: BTreeMap<String, Condition>,
}

impl Selector {
    /// Empty selector, matches every document of the queried type
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), Condition::Eq(value.into()));
        self
    }

    pub fn gte(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), Condition::Gte(value.into()));
        self
    }

    pub fn lte(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), Condition::Lte(value.into()));
        self
    }

    pub fn not_null(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(field.into(), Condition::NotNull);
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Condition)> {
        self.fields.iter()
    }

    /// Evaluate the selector against one JSON document
    pub fn matches(&self, doc: &Value) -> bool {
        self.fields.iter().all(|(field, condition)| {
            let value = doc.get(field);
            match condition {
                Condition::NotNull => value.map_or(false, |v| !v.is_null()),
                Condition::Eq(expected) => value.map_or(false, |v| v == expected),
                Condition::Gte(bound) => {
                    value.map_or(false, |v| compare(v, bound).map_or(false, |o| o.is_ge()))
                }
                Condition::Lte(bound) => {
                    value.map_or(false, |v| compare(v, bound).map_or(false, |o| o.is_le()))
                }
            }
        })
    }
}

/// Ordered comparison of two JSON scalars. String-encoded integers (the
/// ledger's epoch-second convention) compare numerically, everything else
/// falls back to its natural order.
fn compare(a: &Value, b: &Value) -> Option<std::cmp::Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => {
            match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
                (Ok(a), Ok(b)) => Some(a.cmp(&b)),
                _ => Some(a.cmp(b)),
            }
        }
        (Value::Number(a), Value::Number(b)) => {
            let (a, b) = (a.as_f64()?, b.as_f64()?);
            a.partial_cmp(&b)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_selector_matches_all() {
        assert!(Selector::new().matches(&json!({"anything": 1})));
    }

    #[test]
    fn test_eq_condition() {
        let selector = Selector::new().eq("siteId", "S1");
        assert!(selector.matches(&json!({"siteId": "S1"})));
        assert!(!selector.matches(&json!({"siteId": "S2"})));
        assert!(!selector.matches(&json!({"other": "S1"})));
    }

    #[test]
    fn test_range_is_numeric_on_epoch_strings() {
        // Lexicographically "900" > "1000"; numerically it is smaller.
        let selector = Selector::new().gte("timeIntervalEnd", "1000");
        assert!(!selector.matches(&json!({"timeIntervalEnd": "900"})));
        assert!(selector.matches(&json!({"timeIntervalEnd": "1000"})));
        assert!(selector.matches(&json!({"timeIntervalEnd": "2000"})));
    }

    #[test]
    fn test_conditions_are_anded() {
        let selector = Selector::new().eq("siteId", "S1").lte("timeIntervalStart", "2000");
        assert!(selector.matches(&json!({"siteId": "S1", "timeIntervalStart": "1500"})));
        assert!(!selector.matches(&json!({"siteId": "S1", "timeIntervalStart": "2500"})));
        assert!(!selector.matches(&json!({"siteId": "S2", "timeIntervalStart": "1500"})));
    }

    #[test]
    fn test_not_null() {
        let selector = Selector::new().not_null("points");
        assert!(selector.matches(&json!({"points": []})));
        assert!(!selector.matches(&json!({"points": null})));
        assert!(!selector.matches(&json!({})));
    }
}
