//! Generic import reconciliation engine
//!
//! One loop shared by every importer in the suite: prepare the row, classify
//! it against the persisted store, create the aggregate and (when the
//! payload implies one) its dependent record, and fold the outcome into the
//! batch summary.
//!
//! Rows are processed strictly sequentially in row order. That is a
//! correctness requirement, not an optimization choice: duplicate
//! classification for row n must observe the aggregates created by rows
//! 1..n-1 of the same batch, so two rows sharing a natural key can never
//! both come out as `Created`.
//!
//! There is no cross-entity storage transaction. Creating an aggregate and
//! its dependent record is a two-step saga with exactly one compensating
//! action: if the dependent write fails, the just-created aggregate is
//! deleted before a single error is surfaced. The delete is best-effort; if
//! it fails too, the error message carries both failures. No automatic
//! retry, since the cause of a dependent failure may recur.

use crate::models::outcome::{BatchSummary, DuplicateRow, RowError, RowOutcome};
use crate::models::ImportRow;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use stk_common::{Error, Result};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One importable entity: how to turn a raw row into a payload and how to
/// read and write the persisted store for it.
///
/// `prepare` is pure with respect to storage; every catalog it consults is
/// preloaded into the importer before the batch starts.
#[async_trait]
pub trait RowImporter: Send + Sync {
    type Payload: Serialize + DeserializeOwned + Clone + Send + Sync;

    /// Entity name used in log lines and error messages
    fn entity(&self) -> &'static str;

    /// Normalize, validate and resolve one raw row into a payload.
    /// An `Err` is the row-scoped failure message.
    fn prepare(&self, row: &ImportRow) -> std::result::Result<Self::Payload, String>;

    /// Natural-key lookup against the persisted store
    async fn find_existing(&self, payload: &Self::Payload) -> Result<Option<i64>>;

    /// Human-readable rendering of the payload's natural key
    fn natural_key_summary(&self, payload: &Self::Payload) -> String;

    /// Persist a new aggregate, returning its surrogate ID
    async fn insert(&self, payload: &Self::Payload) -> Result<i64>;

    /// Whether this payload implies a dependent record
    fn needs_dependent(&self, _payload: &Self::Payload) -> bool {
        false
    }

    /// Create the dependent record for a just-created aggregate
    async fn create_dependent(&self, _new_id: i64, _payload: &Self::Payload) -> Result<()> {
        Ok(())
    }

    /// Compensating delete of a just-created aggregate
    async fn delete(&self, id: i64) -> Result<()>;

    /// Overwrite every field of an existing aggregate
    async fn update(&self, existing_id: i64, payload: &Self::Payload) -> Result<()>;

    /// Friendly message for a storage uniqueness conflict. `column` is the
    /// first column of the violated constraint when it could be recognized.
    fn conflict_message(&self, _column: Option<&str>, _payload: &Self::Payload) -> String {
        format!("a {} with the same unique values already exists", self.entity())
    }
}

/// Run one import batch. Returns `Err` only for failures before the row
/// loop starts; everything after that is row-scoped and lands in the
/// summary.
pub async fn run_import<I: RowImporter>(importer: &I, rows: &[ImportRow]) -> Result<BatchSummary> {
    let batch_id = Uuid::new_v4();
    info!(
        batch = %batch_id,
        entity = importer.entity(),
        rows = rows.len(),
        "Starting import batch"
    );

    let mut summary = BatchSummary::default();
    for (index, row) in rows.iter().enumerate() {
        // 1-based, matching the operator's sheet
        let row_number = index + 1;
        let outcome = reconcile_row(importer, row_number, row).await;
        match &outcome {
            RowOutcome::Created { id } => {
                debug!(batch = %batch_id, row = row_number, id, "Row created");
            }
            RowOutcome::Duplicate(dup) => {
                debug!(
                    batch = %batch_id,
                    row = row_number,
                    existing_id = dup.existing_id,
                    key = %dup.natural_key_summary,
                    "Row withheld as duplicate"
                );
            }
            RowOutcome::Failed(err) => {
                warn!(batch = %batch_id, row = row_number, message = %err.message, "Row failed");
            }
        }
        summary.record(outcome);
    }

    info!(
        batch = %batch_id,
        created = summary.created,
        duplicates = summary.duplicates.len(),
        errors = summary.errors.len(),
        "Import batch finished"
    );

    Ok(summary)
}

/// Reconcile a single row into exactly one outcome. Never returns early
/// without producing one; infrastructure errors are stringified into a
/// `Failed` outcome so the rest of the batch keeps going.
async fn reconcile_row<I: RowImporter>(
    importer: &I,
    row_number: usize,
    row: &ImportRow,
) -> RowOutcome {
    let failed = |message: String| RowOutcome::Failed(RowError { row: row_number, message });

    // Normalization, validation, reference resolution
    let payload = match importer.prepare(row) {
        Ok(payload) => payload,
        Err(message) => return failed(message),
    };

    // Duplicate classification against the persisted store (which already
    // includes this batch's earlier rows)
    match importer.find_existing(&payload).await {
        Ok(Some(existing_id)) => {
            let payload_json = match serde_json::to_value(&payload) {
                Ok(value) => value,
                Err(e) => return failed(format!("could not serialize payload: {}", e)),
            };
            return RowOutcome::Duplicate(DuplicateRow {
                row: row_number,
                natural_key_summary: importer.natural_key_summary(&payload),
                existing_id,
                payload: payload_json,
            });
        }
        Ok(None) => {}
        Err(e) => return failed(e.to_string()),
    }

    // Create the aggregate. A uniqueness violation here means another
    // writer (or an unclassified unique column like a serial number) got
    // there first; it is translated, never retried.
    let new_id = match importer.insert(&payload).await {
        Ok(id) => id,
        Err(e) => {
            let message = match unique_violation_column(&e) {
                Some(column) => importer.conflict_message(Some(&column), &payload),
                None if is_unique_violation(&e) => importer.conflict_message(None, &payload),
                None => e.to_string(),
            };
            return failed(message);
        }
    };

    // Dependent record, with compensation on failure
    if importer.needs_dependent(&payload) {
        if let Err(dep_err) = importer.create_dependent(new_id, &payload).await {
            let message = match importer.delete(new_id).await {
                Ok(()) => format!(
                    "dependent record could not be created ({}); the new {} was removed",
                    dep_err,
                    importer.entity()
                ),
                Err(del_err) => format!(
                    "dependent record could not be created ({}) and removing the new {} also failed ({}); manual cleanup required",
                    dep_err,
                    importer.entity(),
                    del_err
                ),
            };
            return failed(message);
        }
    }

    RowOutcome::Created { id: new_id }
}

/// True when the error is a storage-layer uniqueness violation
pub fn is_unique_violation(error: &Error) -> bool {
    match error {
        Error::Database(e) => e
            .as_database_error()
            .map(|db| db.is_unique_violation())
            .unwrap_or(false),
        _ => false,
    }
}

/// Extract the first colliding column name from a uniqueness violation.
///
/// SQLite reports `UNIQUE constraint failed: assets.serial_number` (with a
/// comma-separated list for composite constraints); the leading column is
/// enough to pick a friendly message.
pub fn unique_violation_column(error: &Error) -> Option<String> {
    let Error::Database(e) = error else {
        return None;
    };
    let db = e.as_database_error()?;
    if !db.is_unique_violation() {
        return None;
    }

    let message = db.message();
    let rest = message.split("UNIQUE constraint failed:").nth(1)?;
    let first = rest.split(',').next()?.trim();
    first.split('.').nth(1).map(|column| column.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    async fn force_unique_error() -> Error {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        sqlx::query("CREATE TABLE gadgets (id INTEGER PRIMARY KEY, serial TEXT UNIQUE)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO gadgets (serial) VALUES ('X')")
            .execute(&pool)
            .await
            .unwrap();

        let err = sqlx::query("INSERT INTO gadgets (serial) VALUES ('X')")
            .execute(&pool)
            .await
            .unwrap_err();
        Error::Database(err)
    }

    #[tokio::test]
    async fn recognizes_unique_violations_and_names_the_column() {
        let error = force_unique_error().await;

        assert!(is_unique_violation(&error));
        assert_eq!(unique_violation_column(&error).as_deref(), Some("serial"));
    }

    #[tokio::test]
    async fn other_errors_are_not_conflicts() {
        let error = Error::Internal("boom".to_string());

        assert!(!is_unique_violation(&error));
        assert_eq!(unique_violation_column(&error), None);
    }
}
