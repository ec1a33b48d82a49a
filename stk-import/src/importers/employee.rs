//! Employee importer, one of the simplified catalog variants.
//! Natural key: email. No references, no dependent record.

use crate::db::employees::{self, EmployeePayload};
use crate::importers::mandatory_string;
use crate::models::ImportRow;
use crate::services::date_normalizer::normalize_date;
use crate::services::field_normalizer::normalize_keys;
use crate::services::import_engine::RowImporter;
use async_trait::async_trait;
use sqlx::SqlitePool;
use stk_common::Result;

pub struct EmployeeImporter {
    pool: SqlitePool,
}

impl EmployeeImporter {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RowImporter for EmployeeImporter {
    type Payload = EmployeePayload;

    fn entity(&self) -> &'static str {
        "employee"
    }

    fn prepare(&self, row: &ImportRow) -> std::result::Result<EmployeePayload, String> {
        let row = normalize_keys(row)?;

        Ok(EmployeePayload {
            email: mandatory_string(&row, "email")?,
            full_name: mandatory_string(&row, "fullName")?,
            start_date: row.get("startDate").and_then(normalize_date),
        })
    }

    async fn find_existing(&self, payload: &EmployeePayload) -> Result<Option<i64>> {
        employees::find_employee_id_by_email(&self.pool, &payload.email).await
    }

    fn natural_key_summary(&self, payload: &EmployeePayload) -> String {
        format!("email {}", payload.email)
    }

    async fn insert(&self, payload: &EmployeePayload) -> Result<i64> {
        employees::insert_employee(&self.pool, payload).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        employees::delete_employee(&self.pool, id).await
    }

    async fn update(&self, existing_id: i64, payload: &EmployeePayload) -> Result<()> {
        employees::update_employee(&self.pool, existing_id, payload).await
    }

    fn conflict_message(&self, column: Option<&str>, payload: &EmployeePayload) -> String {
        match column {
            Some("email") => format!("email '{}' is already registered", payload.email),
            _ => "an employee with the same unique values already exists".to_string(),
        }
    }
}
