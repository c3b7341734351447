//! Dot-path lookup and flattening over JSON trees.
//!
//! Paths are `.`-separated segments walked over objects and arrays.
//! Segments that parse as unsigned integers index into arrays, so
//! `"items.0.name"` reaches into the first element of an `items`
//! array. A missing intermediate key resolves to `None`, never an
//! error; callers decide how to treat absence.

use serde_json::{Map, Value};

/// Resolve a dot-path inside a JSON value.
///
/// Returns `None` when any segment is missing or the current node is a
/// scalar. Note that a path resolving to an explicit `null` returns
/// `Some(&Value::Null)`; use [`get_present`] when null and absence
/// should be treated uniformly.
pub fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;

    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => {
                let index: usize = segment.parse().ok()?;
                items.get(index)?
            }
            _ => return None,
        };
    }

    Some(current)
}

/// Like [`get_path`], but collapses an explicit `null` into `None`.
///
/// The filter and mapping pipeline treats "field is null" and "field
/// is missing" as the same thing: value not present.
pub fn get_present<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    get_path(root, path).filter(|v| !v.is_null())
}

/// Flatten a JSON object into a single-level map with dot-joined keys.
///
/// Object values are descended into recursively; array values and
/// scalars are leaves. A top-level array is keyed by element index
/// ("0", "1", ...), with object elements descended into under that
/// prefix. A scalar input produces an empty map.
pub fn flatten(value: &Value) -> Map<String, Value> {
    let mut result = Map::new();
    match value {
        Value::Object(map) => flatten_into(map, "", &mut result),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_entry(index.to_string(), item, &mut result);
            }
        }
        _ => {}
    }
    result
}

fn flatten_into(map: &Map<String, Value>, prefix: &str, result: &mut Map<String, Value>) {
    for (key, value) in map {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        flatten_entry(full_key, value, result);
    }
}

fn flatten_entry(key: String, value: &Value, result: &mut Map<String, Value>) {
    match value {
        Value::Object(inner) => flatten_into(inner, &key, result),
        other => {
            result.insert(key, other.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_path_top_level() {
        let value = json!({"id": 7});
        assert_eq!(get_path(&value, "id"), Some(&json!(7)));
    }

    #[test]
    fn test_get_path_nested() {
        let value = json!({"user": {"name": "Alice", "address": {"city": "Oslo"}}});
        assert_eq!(get_path(&value, "user.name"), Some(&json!("Alice")));
        assert_eq!(get_path(&value, "user.address.city"), Some(&json!("Oslo")));
    }

    #[test]
    fn test_get_path_array_index() {
        let value = json!({"items": [{"name": "first"}, {"name": "second"}]});
        assert_eq!(get_path(&value, "items.1.name"), Some(&json!("second")));
    }

    #[test]
    fn test_get_path_missing() {
        let value = json!({"user": {"name": "Alice"}});
        assert_eq!(get_path(&value, "user.age"), None);
        assert_eq!(get_path(&value, "missing.deeply.nested"), None);
    }

    #[test]
    fn test_get_path_through_scalar() {
        let value = json!({"id": 7});
        assert_eq!(get_path(&value, "id.nested"), None);
    }

    #[test]
    fn test_get_path_bad_array_index() {
        let value = json!({"items": [1, 2]});
        assert_eq!(get_path(&value, "items.two"), None);
        assert_eq!(get_path(&value, "items.5"), None);
    }

    #[test]
    fn test_get_path_explicit_null() {
        let value = json!({"field": null});
        assert_eq!(get_path(&value, "field"), Some(&Value::Null));
        assert_eq!(get_present(&value, "field"), None);
    }

    #[test]
    fn test_get_present_missing() {
        let value = json!({});
        assert_eq!(get_present(&value, "field"), None);
    }

    #[test]
    fn test_flatten_nested_objects() {
        let nested = json!({"a": {"b": {"c": 1}}, "d": 2});
        let flat = flatten(&nested);

        let mut expected = Map::new();
        expected.insert("a.b.c".to_string(), json!(1));
        expected.insert("d".to_string(), json!(2));
        assert_eq!(flat, expected);
    }

    #[test]
    fn test_flatten_arrays_are_leaves() {
        let value = json!({"tags": ["a", "b"], "meta": {"ids": [1, 2]}});
        let flat = flatten(&value);

        assert_eq!(flat.get("tags"), Some(&json!(["a", "b"])));
        assert_eq!(flat.get("meta.ids"), Some(&json!([1, 2])));
    }

    #[test]
    fn test_flatten_keeps_null_leaves() {
        let value = json!({"a": {"b": null}});
        let flat = flatten(&value);
        assert_eq!(flat.get("a.b"), Some(&Value::Null));
    }

    #[test]
    fn test_flatten_scalar_is_empty() {
        assert!(flatten(&json!(42)).is_empty());
        assert!(flatten(&Value::Null).is_empty());
    }

    #[test]
    fn test_flatten_top_level_array_uses_index_keys() {
        let flat = flatten(&json!([1, 2]));
        assert_eq!(flat.get("0"), Some(&json!(1)));
        assert_eq!(flat.get("1"), Some(&json!(2)));

        // Object elements descend under the index; array elements stay
        // leaves, like array fields anywhere else.
        let mixed = flatten(&json!([{"a": 1}, [2, 3]]));
        assert_eq!(mixed.get("0.a"), Some(&json!(1)));
        assert_eq!(mixed.get("1"), Some(&json!([2, 3])));
    }

    #[test]
    fn test_flatten_empty_object() {
        assert!(flatten(&json!({})).is_empty());
        assert!(flatten(&json!({"wrapper": {}})).is_empty());
    }
}
