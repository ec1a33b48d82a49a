//! stk-import - Bulk Import Reconciliation Engine
//!
//! Ingests externally authored tabular rows, resolves descriptive references
//! against the hardware catalogs, classifies each row as new or duplicate
//! against the persisted inventory, and creates records under an
//! all-or-nothing guarantee per row.
//!
//! Callers hand the engine pre-parsed rows; reading spreadsheets, HTTP
//! transport and authorization live elsewhere in the suite.

pub mod db;
pub mod importers;
pub mod models;
pub mod services;

pub use crate::models::outcome::{ApplySummary, BatchSummary, DuplicateRow, RowError, RowOutcome};
pub use crate::models::ImportRow;
pub use crate::services::duplicate_applier::apply_duplicates;
pub use crate::services::import_engine::{run_import, RowImporter};
