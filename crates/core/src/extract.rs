//! Record extraction from page payloads.

use serde_json::Value;

use crate::path::get_path;

/// Pull a flat list of raw records out of a sequence of page payloads.
///
/// For each page, `response_path` is resolved when given (the page
/// itself is the target otherwise). An array target is spread one
/// level: each element becomes a record, and nested arrays inside it
/// stay opaque. An object target becomes a single record. Anything
/// else (null, scalar, missing path) contributes nothing. Record order
/// follows page order, then within-page element order.
pub fn extract_records(pages: &[Value], response_path: Option<&str>) -> Vec<Value> {
    let mut records = Vec::new();

    for page in pages {
        let target = match response_path {
            Some(path) => match get_path(page, path) {
                Some(value) => value,
                None => continue,
            },
            None => page,
        };

        match target {
            Value::Array(items) => records.extend(items.iter().cloned()),
            Value::Object(_) => records.push(target.clone()),
            _ => {}
        }
    }

    records
}

/// Whether a page payload counts as empty for pagination termination.
///
/// Empty means null, an empty array, or an object with no keys. An
/// object with zero keys terminates even when it is a meaningful
/// empty-collection wrapper; callers rely on `max_pages` to bound the
/// cases this heuristic misses.
pub fn page_is_empty(page: &Value) -> bool {
    match page {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
