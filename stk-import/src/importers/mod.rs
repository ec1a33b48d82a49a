//! Importable entities
//!
//! Each importer implements [`RowImporter`](crate::services::import_engine::RowImporter)
//! for one aggregate. The asset importer is the rich variant (descriptive
//! hardware references, status inference, assignment dependent); sites and
//! employees are the simplified catalog variants of the same pattern.

pub mod asset;
pub mod employee;
pub mod site;

use crate::models::ImportRow;
use serde_json::Value;

/// Read a cell as trimmed text; empty cells count as absent
pub(crate) fn field_string(row: &ImportRow, key: &str) -> Option<String> {
    match row.get(key) {
        Some(Value::String(s)) => {
            let text = s.trim();
            if text.is_empty() {
                None
            } else {
                Some(text.to_string())
            }
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a cell as an integer; accepts numeric strings, rejects fractions
pub(crate) fn field_i64(row: &ImportRow, key: &str) -> Result<Option<i64>, String> {
    match row.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_i64() {
                Ok(Some(v))
            } else if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 {
                    Ok(Some(f as i64))
                } else {
                    Err(format!("field '{}' must be a whole number, got {}", key, f))
                }
            } else {
                Err(format!("field '{}' must be a whole number", key))
            }
        }
        Some(Value::String(s)) => {
            let text = s.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<i64>()
                .map(Some)
                .map_err(|_| format!("field '{}' must be a number, got '{}'", key, text))
        }
        Some(_) => Err(format!("field '{}' must be a number", key)),
    }
}

pub(crate) fn mandatory_string(row: &ImportRow, key: &str) -> Result<String, String> {
    field_string(row, key).ok_or_else(|| format!("missing mandatory field '{}'", key))
}

pub(crate) fn mandatory_i64(row: &ImportRow, key: &str) -> Result<i64, String> {
    field_i64(row, key)?.ok_or_else(|| format!("missing mandatory field '{}'", key))
}
