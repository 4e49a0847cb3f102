//! Column schema: ordered column definitions, immutable after construction.
//!
//! The schema is usually supplied as a JSON object whose key order is the
//! column order:
//!
//! ```json
//! {
//!   "name":   { "type": "text", "label": "Name", "required": true, "maxlength": 40 },
//!   "age":    { "type": "number", "label": "Age", "decimal": 0 },
//!   "status": { "type": "select", "label": "Status",
//!               "values": [{ "id": 1, "name": "Open" }, { "id": 2, "name": "Closed" }] }
//! }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Value type of a column. Drives formatting, coercion and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Boolean,
    Date,
    Email,
    Select,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Number => "number",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::Email => "email",
            ColumnType::Select => "select",
        }
    }
}

/// One entry of a select column's option list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Stored value (number or string).
    pub id: Value,
    /// Display name.
    pub name: String,
}

impl SelectOption {
    pub fn new(id: impl Into<Value>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// Definition of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Key into each row's data map. Filled from the schema object key.
    #[serde(skip)]
    pub key: String,
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxlength: Option<usize>,
    /// Fraction digits shown for number columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal: Option<u8>,
    /// Options for select columns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<SelectOption>,
}

impl ColumnDef {
    pub fn new(key: impl Into<String>, column_type: ColumnType) -> Self {
        let key = key.into();
        Self {
            label: key.clone(),
            key,
            column_type,
            required: false,
            maxlength: None,
            decimal: None,
            values: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_maxlength(mut self, max: usize) -> Self {
        self.maxlength = Some(max);
        self
    }

    pub fn with_decimal(mut self, digits: u8) -> Self {
        self.decimal = Some(digits);
        self
    }

    pub fn with_options(mut self, values: Vec<SelectOption>) -> Self {
        self.values = values;
        self
    }

    /// Look up a select option by its stored id.
    ///
    /// Ids compare loosely: `1` and `"1"` match, since pasted text carries
    /// ids as strings.
    pub fn option_by_id(&self, id: &Value) -> Option<&SelectOption> {
        self.values.iter().find(|opt| ids_match(&opt.id, id))
    }

    /// Look up a select option by display name, case-insensitively.
    pub fn option_by_name(&self, name: &str) -> Option<&SelectOption> {
        let needle = name.trim().to_lowercase();
        self.values.iter().find(|opt| opt.name.to_lowercase() == needle)
    }
}

fn ids_match(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match (a, b) {
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            s.trim() == n.to_string()
        }
        _ => false,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("schema must be a JSON object mapping column keys to definitions")]
    NotAnObject,
    #[error("invalid schema JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("column '{key}': {source}")]
    Column {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate column key '{0}'")]
    DuplicateKey(String),
}

/// Ordered column definitions with O(1) key lookup.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    columns: Vec<ColumnDef>,
    index: HashMap<String, usize>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnDef>) -> Result<Self, SchemaError> {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, col) in columns.iter().enumerate() {
            if index.insert(col.key.clone(), i).is_some() {
                return Err(SchemaError::DuplicateKey(col.key.clone()));
            }
        }
        Ok(Self { columns, index })
    }

    /// Parse a schema from a JSON object. Key order is column order.
    pub fn from_json(input: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        let Value::Object(map) = value else {
            return Err(SchemaError::NotAnObject);
        };

        let mut columns = Vec::with_capacity(map.len());
        for (key, def) in map {
            let mut col: ColumnDef = serde_json::from_value(def)
                .map_err(|source| SchemaError::Column { key: key.clone(), source })?;
            if col.label.is_empty() {
                col.label = key.clone();
            }
            col.key = key;
            columns.push(col);
        }
        Self::new(columns)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&ColumnDef> {
        self.columns.get(index)
    }

    pub fn column_by_key(&self, key: &str) -> Option<&ColumnDef> {
        self.index_of(key).map(|i| &self.columns[i])
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_keeps_key_order() {
        let schema = Schema::from_json(r#"{
            "zeta":  { "type": "text" },
            "alpha": { "type": "number", "label": "Alpha", "decimal": 2 },
            "mid":   { "type": "boolean", "required": true }
        }"#).unwrap();

        let keys: Vec<_> = schema.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(schema.column(0).unwrap().label, "zeta");
        assert_eq!(schema.column(1).unwrap().decimal, Some(2));
        assert!(schema.column(2).unwrap().required);
        assert_eq!(schema.index_of("mid"), Some(2));
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let err = Schema::from_json(r#"{ "a": { "type": "currency" } }"#).unwrap_err();
        assert!(matches!(err, SchemaError::Column { ref key, .. } if key == "a"));
    }

    #[test]
    fn test_not_an_object() {
        assert!(matches!(Schema::from_json("[1, 2]"), Err(SchemaError::NotAnObject)));
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let cols = vec![ColumnDef::new("a", ColumnType::Text), ColumnDef::new("a", ColumnType::Number)];
        assert!(matches!(Schema::new(cols), Err(SchemaError::DuplicateKey(_))));
    }

    #[test]
    fn test_select_lookup() {
        let col = ColumnDef::new("status", ColumnType::Select).with_options(vec![
            SelectOption::new(1, "Open"),
            SelectOption::new("x", "Closed"),
        ]);
        assert_eq!(col.option_by_id(&json!(1)).unwrap().name, "Open");
        assert_eq!(col.option_by_id(&json!("1")).unwrap().name, "Open");
        assert_eq!(col.option_by_name("  closed ").unwrap().id, json!("x"));
        assert!(col.option_by_id(&json!(3)).is_none());
    }
}
