//! The declarative filter/map pipeline.
//!
//! Each raw record is filtered first and mapped second; a record that
//! fails any filter rule is dropped before its mapping is ever
//! computed.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::{flatten, get_path, get_present};
use crate::serialize::display_value;

/// A single output record: insertion-ordered string keys to JSON values.
pub type OutputRecord = serde_json::Map<String, Value>;

/// Maps a dot-path in the raw record to an output key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRule {
    pub from: String,
    pub to: String,
}

/// Comparison operator for a filter rule.
///
/// Operators the settings document names but this enum does not know
/// fall into [`FilterOp::Other`], which always matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
    #[serde(other)]
    Other,
}

/// A predicate over one dot-path of a raw record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRule {
    pub path: String,
    pub op: FilterOp,
    pub value: Value,
}

/// Native ordering over resolved values: numbers compare numerically,
/// strings lexicographically, anything else is incomparable.
fn compare_values(actual: &Value, expected: &Value) -> Option<Ordering> {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Evaluate one filter rule against a record.
///
/// A missing path and an explicit null resolve identically: the value
/// is not present. `eq` never matches an absent value, `contains`
/// returns false for one, and the ordering operators treat it as
/// incomparable.
pub fn matches_filter_rule(record: &Value, rule: &FilterRule) -> bool {
    let actual = get_present(record, &rule.path);

    match rule.op {
        FilterOp::Eq => actual.is_some_and(|v| v == &rule.value),
        FilterOp::Neq => !actual.is_some_and(|v| v == &rule.value),
        FilterOp::Gt => actual
            .and_then(|v| compare_values(v, &rule.value))
            .is_some_and(|ord| ord == Ordering::Greater),
        FilterOp::Gte => actual
            .and_then(|v| compare_values(v, &rule.value))
            .is_some_and(|ord| ord != Ordering::Less),
        FilterOp::Lt => actual
            .and_then(|v| compare_values(v, &rule.value))
            .is_some_and(|ord| ord == Ordering::Less),
        FilterOp::Lte => actual
            .and_then(|v| compare_values(v, &rule.value))
            .is_some_and(|ord| ord != Ordering::Greater),
        FilterOp::Contains => match actual {
            Some(v) => display_value(v).contains(&display_value(&rule.value)),
            None => false,
        },
        FilterOp::Other => true,
    }
}

/// A record passes only when every rule matches. An empty rule list
/// passes everything.
pub fn passes_filters(record: &Value, filters: &[FilterRule]) -> bool {
    filters.iter().all(|rule| matches_filter_rule(record, rule))
}

/// Apply mapping rules to a record that already passed the filters.
///
/// With rules present, each `from` path is resolved and assigned to
/// its `to` key in rule order; later rules overwrite earlier ones on
/// key collision, and a missing path assigns null. With no rules, the
/// record is dot-path flattened instead.
pub fn apply_mapping(record: &Value, mapping: &[MappingRule]) -> OutputRecord {
    if mapping.is_empty() {
        return flatten(record);
    }

    let mut result = OutputRecord::new();
    for rule in mapping {
        let value = get_path(record, &rule.from).cloned().unwrap_or(Value::Null);
        result.insert(rule.to.clone(), value);
    }
    result
}

/// Run the full pipeline over a record sequence, preserving order.
pub fn transform_records(
    records: &[Value],
    mapping: &[MappingRule],
    filters: &[FilterRule],
) -> Vec<OutputRecord> {
    records
        .iter()
        .filter(|record| passes_filters(record, filters))
        .map(|record| apply_mapping(record, mapping))
        .collect()
}
