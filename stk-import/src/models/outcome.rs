//! Per-row outcomes and batch summaries
//!
//! Every input row yields exactly one [`RowOutcome`]; the summary is a pure
//! fold over the outcome sequence in row order.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of reconciling a single input row
#[derive(Debug, Clone)]
pub enum RowOutcome {
    /// A new aggregate (and its dependent record, if any) was persisted
    Created { id: i64 },
    /// The natural key already exists; nothing was written
    Duplicate(DuplicateRow),
    /// The row was recorded as failed; nothing was written
    Failed(RowError),
}

/// A withheld row whose natural key matched an existing aggregate.
///
/// Returned to the caller for confirmation and later passed back verbatim to
/// the duplicate-resolution pass. The payload travels as JSON so the UI
/// round-trip does not depend on the entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateRow {
    /// 1-based row number in the source sheet
    pub row: usize,
    pub natural_key_summary: String,
    pub existing_id: i64,
    pub payload: Value,
}

/// A row-scoped failure message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowError {
    /// 1-based row number in the source sheet
    pub row: usize,
    pub message: String,
}

/// Result of one import batch.
///
/// Serialized field names keep the wire contract the suite's UI has always
/// consumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    #[serde(rename = "insertados")]
    pub created: u64,
    #[serde(rename = "duplicados")]
    pub duplicates: Vec<DuplicateRow>,
    #[serde(rename = "errores")]
    pub errors: Vec<RowError>,
}

impl BatchSummary {
    /// Fold one outcome into the summary, preserving arrival order
    pub fn record(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Created { .. } => self.created += 1,
            RowOutcome::Duplicate(dup) => self.duplicates.push(dup),
            RowOutcome::Failed(err) => self.errors.push(err),
        }
    }

    /// Number of rows accounted for: created + duplicates + errors
    pub fn total_rows(&self) -> usize {
        self.created as usize + self.duplicates.len() + self.errors.len()
    }
}

/// Result of a duplicate-resolution pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplySummary {
    pub updated_count: u64,
    pub errors: Vec<RowError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_fold_preserves_order_and_counts() {
        let mut summary = BatchSummary::default();
        summary.record(RowOutcome::Created { id: 1 });
        summary.record(RowOutcome::Failed(RowError {
            row: 2,
            message: "missing mandatory field 'assetTag'".to_string(),
        }));
        summary.record(RowOutcome::Duplicate(DuplicateRow {
            row: 3,
            natural_key_summary: "site 1 / tag A1".to_string(),
            existing_id: 1,
            payload: json!({"assetTag": "A1"}),
        }));
        summary.record(RowOutcome::Failed(RowError {
            row: 4,
            message: "missing mandatory field 'assetTag'".to_string(),
        }));

        assert_eq!(summary.created, 1);
        assert_eq!(summary.duplicates.len(), 1);
        assert_eq!(summary.errors.len(), 2);
        assert_eq!(summary.total_rows(), 4);
        // Repeated messages are kept as-is, one per row
        assert_eq!(summary.errors[0].row, 2);
        assert_eq!(summary.errors[1].row, 4);
    }

    #[test]
    fn summary_serializes_with_legacy_wire_names() {
        let mut summary = BatchSummary::default();
        summary.record(RowOutcome::Created { id: 7 });

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["insertados"], 1);
        assert!(value["duplicados"].as_array().unwrap().is_empty());
        assert!(value["errores"].as_array().unwrap().is_empty());
    }

    #[test]
    fn duplicate_row_round_trips_through_json() {
        let dup = DuplicateRow {
            row: 5,
            natural_key_summary: "code MAD".to_string(),
            existing_id: 12,
            payload: json!({"code": "MAD", "name": "Madrid"}),
        };

        let text = serde_json::to_string(&dup).unwrap();
        assert!(text.contains("naturalKeySummary"));
        assert!(text.contains("existingId"));

        let back: DuplicateRow = serde_json::from_str(&text).unwrap();
        assert_eq!(back, dup);
    }
}
