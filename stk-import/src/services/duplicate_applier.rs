//! Duplicate resolution pass
//!
//! Duplicates are never applied during the import pass: the first pass
//! withholds them and returns them to the caller, who shows them to a human
//! before invoking this explicit second entry point. Confirmation means a
//! full-field overwrite of the existing aggregate, not a merge.
//!
//! Items are processed independently: one failure never blocks the rest,
//! and failures accumulate keyed by the original row number so the operator
//! can trace them back to the sheet.

use crate::models::outcome::{ApplySummary, DuplicateRow, RowError};
use crate::services::import_engine::RowImporter;
use stk_common::Result;
use tracing::{debug, info, warn};

/// Apply confirmed duplicates. Idempotent per item: overwriting an
/// aggregate twice with the same payload leaves the same persisted state.
pub async fn apply_duplicates<I: RowImporter>(
    importer: &I,
    items: &[DuplicateRow],
) -> Result<ApplySummary> {
    info!(entity = importer.entity(), items = items.len(), "Applying confirmed duplicates");

    let mut summary = ApplySummary::default();
    for item in items {
        let payload: I::Payload = match serde_json::from_value(item.payload.clone()) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(row = item.row, "Rejecting duplicate item with invalid payload");
                summary.errors.push(RowError {
                    row: item.row,
                    message: format!("invalid payload for confirmed duplicate: {}", e),
                });
                continue;
            }
        };

        match importer.update(item.existing_id, &payload).await {
            Ok(()) => {
                debug!(row = item.row, existing_id = item.existing_id, "Duplicate overwritten");
                summary.updated_count += 1;
            }
            Err(e) => {
                warn!(row = item.row, existing_id = item.existing_id, error = %e, "Duplicate overwrite failed");
                summary.errors.push(RowError { row: item.row, message: e.to_string() });
            }
        }
    }

    info!(
        entity = importer.entity(),
        updated = summary.updated_count,
        errors = summary.errors.len(),
        "Duplicate resolution finished"
    );

    Ok(summary)
}
