//! Column name canonicalization
//!
//! Importable sheets are authored by humans: the same column arrives as
//! `Site ID`, `site_id` or `siteId` depending on who exported the file.
//! Every key is canonicalized to lower-camel-case before the pipeline looks
//! at the row, recursing into nested structures. Values pass through
//! unchanged; no validation happens here.
//!
//! Two distinct input keys can collapse into one canonical key; that is
//! reported as an error instead of letting one cell silently overwrite the
//! other.

use crate::models::ImportRow;
use serde_json::Value;

/// Canonicalize a single column label to lower-camel-case.
///
/// Words are split on spaces, underscores, hyphens and case boundaries;
/// acronym runs fold to one word (`"CPU Vendor"` -> `cpuVendor`,
/// `"IMEI"` -> `imei`, `"Site ID"` -> `siteId`).
pub fn canonical_key(key: &str) -> String {
    let words = split_words(key);

    let mut out = String::with_capacity(key.len());
    for (i, word) in words.iter().enumerate() {
        let lower = word.to_lowercase();
        if i == 0 {
            out.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}

/// Canonicalize every key of a row. Returns an error message when two input
/// keys collapse into the same canonical key.
pub fn normalize_keys(row: &ImportRow) -> Result<ImportRow, String> {
    let mut out = ImportRow::new();
    for (key, value) in row {
        let canonical = canonical_key(key);
        if out.contains_key(&canonical) {
            return Err(format!(
                "column '{}' collides with another column (both normalize to '{}')",
                key, canonical
            ));
        }
        out.insert(canonical, normalize_value(value)?);
    }
    Ok(out)
}

fn normalize_value(value: &Value) -> Result<Value, String> {
    match value {
        Value::Object(map) => Ok(Value::Object(normalize_keys(map)?)),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(normalize_value(item)?);
            }
            Ok(Value::Array(out))
        }
        other => Ok(other.clone()),
    }
}

fn split_words(key: &str) -> Vec<String> {
    let chars: Vec<char> = key.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for i in 0..chars.len() {
        let c = chars[i];
        if c == ' ' || c == '_' || c == '-' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map(|n| n.is_lowercase()).unwrap_or(false);
            // Boundary: camelCase transition, or the last capital of an
            // acronym run followed by a lowercase tail (XMLFile -> XML File)
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonicalizes_display_names() {
        assert_eq!(canonical_key("Site ID"), "siteId");
        assert_eq!(canonical_key("CPU Vendor"), "cpuVendor");
        assert_eq!(canonical_key("RAM Capacity GB"), "ramCapacityGb");
        assert_eq!(canonical_key("IMEI"), "imei");
        assert_eq!(canonical_key("Serial Number"), "serialNumber");
    }

    #[test]
    fn canonicalizes_snake_and_camel_case() {
        assert_eq!(canonical_key("asset_tag"), "assetTag");
        assert_eq!(canonical_key("warranty-end"), "warrantyEnd");
        assert_eq!(canonical_key("purchaseDate"), "purchaseDate");
        assert_eq!(canonical_key("AssetTag"), "assetTag");
    }

    #[test]
    fn values_pass_through_unchanged() {
        let mut row = ImportRow::new();
        row.insert("Asset Tag".to_string(), json!("A-0001"));
        row.insert("Site ID".to_string(), json!(3));

        let normalized = normalize_keys(&row).unwrap();
        assert_eq!(normalized["assetTag"], json!("A-0001"));
        assert_eq!(normalized["siteId"], json!(3));
    }

    #[test]
    fn recurses_into_nested_structures() {
        let mut row = ImportRow::new();
        row.insert(
            "Hardware".to_string(),
            json!({"CPU Vendor": "Intel", "Drive Types": [{"Drive Type": "SSD"}]}),
        );

        let normalized = normalize_keys(&row).unwrap();
        assert_eq!(normalized["hardware"]["cpuVendor"], json!("Intel"));
        assert_eq!(normalized["hardware"]["driveTypes"][0]["driveType"], json!("SSD"));
    }

    #[test]
    fn detects_post_canonicalization_collisions() {
        let mut row = ImportRow::new();
        row.insert("Asset Tag".to_string(), json!("A1"));
        row.insert("asset_tag".to_string(), json!("A2"));

        let err = normalize_keys(&row).unwrap_err();
        assert!(err.contains("assetTag"), "unexpected message: {}", err);
    }
}
