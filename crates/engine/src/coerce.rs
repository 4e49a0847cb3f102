//! Cross-type value conversion for fill and paste.
//!
//! When a value copied from one column lands in a column of a different type
//! it is converted here. `None` means "no sensible conversion"; callers skip
//! the target cell instead of failing the whole operation.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

use datagrid_core::value::{is_blank, to_plain_text};
use datagrid_core::{ColumnDef, ColumnType};

const TRUE_TOKENS: [&str; 4] = ["true", "yes", "1", "y"];
const FALSE_TOKENS: [&str; 4] = ["false", "no", "0", "n"];

/// Formats accepted when turning text into an ISO date, tried in order.
const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
];

/// Convert `value` from the `source` column's type into `target`'s type.
pub fn coerce(value: &Value, source: &ColumnDef, target: &ColumnDef) -> Option<Value> {
    coerce_from_type(value, source.column_type, Some(source), target)
}

/// Like [`coerce`] when only the source type is known.
///
/// `source` is used to resolve select ids to display names; without it a
/// select value is treated as its raw id.
pub fn coerce_from_type(
    value: &Value,
    source_type: ColumnType,
    source: Option<&ColumnDef>,
    target: &ColumnDef,
) -> Option<Value> {
    if source_type == target.column_type {
        return Some(value.clone());
    }
    if is_blank(value) {
        return Some(Value::Null);
    }

    let text = source_text(value, source_type, source);

    match target.column_type {
        ColumnType::Text | ColumnType::Email => Some(Value::String(text)),
        ColumnType::Number => match value {
            Value::Number(n) => Some(Value::Number(n.clone())),
            Value::Bool(_) => None,
            _ => parse_number(&text),
        },
        ColumnType::Boolean => parse_bool(&text).map(Value::Bool),
        ColumnType::Date => parse_date(&text).map(Value::String),
        ColumnType::Select => {
            let by_id = target.option_by_id(value).or_else(|| target.option_by_id(&Value::String(text.clone())));
            by_id
                .or_else(|| target.option_by_name(&text))
                .map(|opt| opt.id.clone())
        }
    }
}

/// Text form of a value as its source column would present it.
fn source_text(value: &Value, source_type: ColumnType, source: Option<&ColumnDef>) -> String {
    match (source_type, value) {
        (ColumnType::Boolean, Value::Bool(b)) => bool_text(*b).to_string(),
        (ColumnType::Select, v) => source
            .and_then(|col| col.option_by_id(v))
            .map(|opt| opt.name.clone())
            .unwrap_or_else(|| to_plain_text(v)),
        (_, v) => to_plain_text(v),
    }
}

pub fn bool_text(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

/// Case-insensitive boolean token matching.
pub fn parse_bool(input: &str) -> Option<bool> {
    let token = input.trim().to_lowercase();
    if TRUE_TOKENS.contains(&token.as_str()) {
        Some(true)
    } else if FALSE_TOKENS.contains(&token.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Digits with `,` between groups of three, e.g. `-1,250,000.5`.
static GROUPED_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?\d{1,3}(,\d{3})+(\.\d+)?$").expect("grouped number pattern is valid")
});

/// Parse a number, keeping integers as integers.
///
/// Whitespace is trimmed and a leading `+` is allowed. Commas are accepted
/// only as thousands separators; `1,2` is not a number.
pub fn parse_number(input: &str) -> Option<Value> {
    let trimmed = input.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let normalized = if unsigned.contains(',') {
        if !GROUPED_NUMBER.is_match(unsigned) {
            return None;
        }
        unsigned.replace(',', "")
    } else {
        unsigned.to_string()
    };
    if normalized.is_empty() {
        return None;
    }

    if let Ok(i) = normalized.parse::<i64>() {
        return Some(Value::Number(i.into()));
    }
    let f = normalized.parse::<f64>().ok()?;
    Number::from_f64(f).map(Value::Number)
}

/// Parse a date in any accepted format and return it as ISO `YYYY-MM-DD`.
pub fn parse_date(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive().format("%Y-%m-%d").to_string());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date().format("%Y-%m-%d").to_string());
    }
    None
}
