//! Cell value validation against the column schema.
//!
//! Validation never throws at the caller. A failure becomes a per-cell error
//! overlay (see `StateManager::write_validated`), and the write is refused.
//!
//! Rules, checked in order:
//! - **Required**: blank values (null, whitespace-only text) are rejected.
//! - **Max length**: the text form of the value may not exceed `maxlength`
//!   characters (counted as Unicode scalar values, not bytes).
//! - **Email**: non-blank values in email columns must look like `local@domain.tld`.
//!
//! Blank values in non-required columns are always valid.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use datagrid_core::value::{is_blank, to_plain_text};
use datagrid_core::{ColumnDef, ColumnType};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Reason a value was refused. `Display` is the message shown on the cell.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{label} is required")]
    RequiredEmpty { label: String },
    #[error("{label} must be at most {max} characters")]
    MaxLengthExceeded { label: String, max: usize },
    #[error("{label} must be a valid email address")]
    InvalidEmail { label: String },
}

impl ValidationError {
    /// Required-empty failures on an already-empty cell leave a sticky marker.
    pub fn is_required_empty(&self) -> bool {
        matches!(self, ValidationError::RequiredEmpty { .. })
    }
}

pub fn validate(column: &ColumnDef, value: &Value) -> Result<(), ValidationError> {
    if is_blank(value) {
        if column.required {
            return Err(ValidationError::RequiredEmpty { label: column.label.clone() });
        }
        return Ok(());
    }

    if let Some(max) = column.maxlength {
        if to_plain_text(value).chars().count() > max {
            return Err(ValidationError::MaxLengthExceeded { label: column.label.clone(), max });
        }
    }

    if column.column_type == ColumnType::Email && !is_valid_email(&to_plain_text(value)) {
        return Err(ValidationError::InvalidEmail { label: column.label.clone() });
    }

    Ok(())
}

pub fn is_valid_email(input: &str) -> bool {
    EMAIL_RE.is_match(input.trim())
}
