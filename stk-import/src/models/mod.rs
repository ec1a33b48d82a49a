//! Pipeline data contracts

pub mod outcome;

/// One raw input line: column label -> cell value, as produced by whatever
/// tabular reader the caller used. Ephemeral, scoped to one batch.
pub type ImportRow = serde_json::Map<String, serde_json::Value>;
