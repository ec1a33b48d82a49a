//! Date value canonicalization
//!
//! Spreadsheet exports deliver dates in three shapes: a numeric date serial,
//! an ISO `YYYY-MM-DD` string, or some other human-written calendar string.
//! All of them normalize to `YYYY-MM-DD`. An empty or unparseable value is
//! dropped (date columns are optional), never turned into a row error.

use chrono::{Duration, NaiveDate};
use serde_json::Value;

/// Canonical output format
const ISO_FORMAT: &str = "%Y-%m-%d";

/// Calendar string formats accepted besides ISO, tried in order
const FALLBACK_FORMATS: &[&str] = &["%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%Y/%m/%d", "%d.%m.%Y"];

/// Upper bound for plausible serials (year 2173); anything outside is noise
const MAX_SERIAL: i64 = 100_000;

/// Normalize a date-like cell to `YYYY-MM-DD`, or `None` to omit it
pub fn normalize_date(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => {
            // Spreadsheet serial: day 0 = 1899-12-30 (the legacy leap-year
            // convention); a fractional part is a time of day, truncated
            let days = n.as_f64()?.trunc() as i64;
            serial_to_date(days).map(|d| d.format(ISO_FORMAT).to_string())
        }
        Value::String(s) => {
            let text = s.trim();
            if text.is_empty() {
                return None;
            }
            if let Ok(date) = NaiveDate::parse_from_str(text, ISO_FORMAT) {
                return Some(date.format(ISO_FORMAT).to_string());
            }
            FALLBACK_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .map(|d| d.format(ISO_FORMAT).to_string())
        }
        _ => None,
    }
}

fn serial_to_date(days: i64) -> Option<NaiveDate> {
    if !(0..=MAX_SERIAL).contains(&days) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serial_45000_is_2023_03_15() {
        // Reference value cross-checked against chrono's own arithmetic
        let expected = NaiveDate::from_ymd_opt(1899, 12, 30)
            .unwrap()
            .checked_add_signed(Duration::days(45000))
            .unwrap()
            .format("%Y-%m-%d")
            .to_string();

        assert_eq!(normalize_date(&json!(45000)).unwrap(), expected);
        assert_eq!(normalize_date(&json!(45000)).unwrap(), "2023-03-15");
    }

    #[test]
    fn serial_fraction_is_truncated() {
        assert_eq!(normalize_date(&json!(45000.73)).unwrap(), "2023-03-15");
    }

    #[test]
    fn iso_strings_pass_through() {
        assert_eq!(normalize_date(&json!("2024-01-31")).unwrap(), "2024-01-31");
    }

    #[test]
    fn common_formats_are_accepted() {
        assert_eq!(normalize_date(&json!("31/01/2024")).unwrap(), "2024-01-31");
        assert_eq!(normalize_date(&json!("2024/01/31")).unwrap(), "2024-01-31");
        assert_eq!(normalize_date(&json!("31.01.2024")).unwrap(), "2024-01-31");
    }

    #[test]
    fn garbage_is_a_soft_omit() {
        assert_eq!(normalize_date(&json!("")), None);
        assert_eq!(normalize_date(&json!("  ")), None);
        assert_eq!(normalize_date(&json!("next tuesday")), None);
        assert_eq!(normalize_date(&json!(-3)), None);
        assert_eq!(normalize_date(&json!(9_999_999)), None);
        assert_eq!(normalize_date(&json!(null)), None);
        assert_eq!(normalize_date(&json!(true)), None);
    }
}
