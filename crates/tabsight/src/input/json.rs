//! JSON documents flattened into records.

use serde_json::Value;
use tracing::{debug, warn};

use super::source::{DataTable, Record};

/// Convert JSON text into a table.
///
/// Accepted shapes: an array of objects, a single object, or an object holding
/// exactly one array of objects. Anything else, including unparseable text,
/// yields an empty table.
pub fn parse_json(text: &str) -> DataTable {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Unparseable JSON input");
            return DataTable::empty();
        }
    };

    let records = match &value {
        Value::Array(items) => records_from_array(items),
        Value::Object(map) => {
            let nested: Vec<&Vec<Value>> = map
                .values()
                .filter_map(|v| match v {
                    Value::Array(items) if items.iter().any(Value::is_object) => Some(items),
                    _ => None,
                })
                .collect();

            match nested.as_slice() {
                [items] => records_from_array(items),
                _ => vec![record_from_object(&value)],
            }
        }
        _ => Vec::new(),
    };

    debug!(records = records.len(), "Flattened JSON input");
    DataTable::from_records(&records)
}

fn records_from_array(items: &[Value]) -> Vec<Record> {
    items
        .iter()
        .filter(|item| item.is_object())
        .map(record_from_object)
        .collect()
}

fn record_from_object(value: &Value) -> Record {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(key, v)| (key.clone(), cell_text(v)))
            .collect(),
        _ => Record::new(),
    }
}

/// Render a JSON value as a raw cell.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_of_objects() {
        let table = parse_json(r#"[{"a": 1, "b": "x"}, {"a": 2.5, "c": null}]"#);

        assert_eq!(table.headers, vec!["a", "b", "c"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(1, 0), Some("2.5"));
        assert_eq!(table.get(1, 2), Some(""));
    }

    #[test]
    fn test_wrapped_array() {
        let table = parse_json(r#"{"meta": "v1", "data": [{"k": "cpu"}, {"k": "mem"}]}"#);
        assert_eq!(table.headers, vec!["k"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_single_object() {
        let table = parse_json(r#"{"latency": "12ms", "tags": ["a", "b"]}"#);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.get(0, 1), Some(r#"["a","b"]"#));
    }

    #[test]
    fn test_blank_objects_are_not_samples() {
        let table = parse_json(r#"[{"a": "", "b": null}, {"a": "", "b": ""}]"#);
        assert!(table.is_empty());

        let table = parse_json(r#"[{"a": "", "b": null}, {"a": 3, "b": ""}]"#);
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_garbage_is_empty() {
        assert!(parse_json("{not json").is_empty());
        assert!(parse_json("42").is_empty());
    }
}
