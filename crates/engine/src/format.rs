//! Display text for cells.

use chrono::NaiveDate;
use serde_json::Value;

use datagrid_core::value::to_plain_text;
use datagrid_core::{ColumnDef, ColumnType};

use crate::coerce::bool_text;

/// Format a stored value for display in `column`.
///
/// - boolean: "True" / "False", empty for anything else
/// - select: the option's display name, empty if the id is unknown
/// - date: ISO `YYYY-MM-DD` reformatted with `date_format`; unparseable
///   dates are shown as stored
/// - number: `decimal` fraction digits when the column sets it
/// - everything else: plain string coercion
pub fn format_cell(column: &ColumnDef, value: &Value, date_format: &str) -> String {
    if value.is_null() {
        return String::new();
    }

    match column.column_type {
        ColumnType::Boolean => match value {
            Value::Bool(b) => bool_text(*b).to_string(),
            _ => String::new(),
        },
        ColumnType::Select => column
            .option_by_id(value)
            .map(|opt| opt.name.clone())
            .unwrap_or_default(),
        ColumnType::Date => {
            let raw = to_plain_text(value);
            // Accept a full ISO timestamp by looking at the date part only
            let date_part = raw.get(..10).unwrap_or(&raw);
            match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
                Ok(date) => date.format(date_format).to_string(),
                Err(_) => raw,
            }
        }
        ColumnType::Number => match (value, column.decimal) {
            (Value::Number(n), Some(decimals)) => match n.as_f64() {
                Some(f) => format!("{:.*}", decimals as usize, f),
                None => n.to_string(),
            },
            _ => to_plain_text(value),
        },
        ColumnType::Text | ColumnType::Email => to_plain_text(value),
    }
}
