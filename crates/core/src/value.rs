//! Cell and row value representation.
//!
//! Columns are heterogeneous and schema-typed, so cell values are plain JSON
//! values and a row is a JSON object keyed by column key.

use serde_json::Value;

pub type CellValue = Value;
pub type RowData = serde_json::Map<String, Value>;

/// True for null, missing-equivalent and whitespace-only strings.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Plain string coercion, used for text columns and clipboard text.
pub fn to_plain_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Build an empty row with every schema key present and null.
pub fn empty_row<'a>(keys: impl Iterator<Item = &'a str>) -> RowData {
    keys.map(|k| (k.to_string(), Value::Null)).collect()
}
