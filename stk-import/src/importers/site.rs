//! Site importer, one of the simplified catalog variants.
//! Natural key: code. No references, no dependent record.

use crate::db::sites::{self, SitePayload};
use crate::importers::{field_string, mandatory_string};
use crate::models::ImportRow;
use crate::services::field_normalizer::normalize_keys;
use crate::services::import_engine::RowImporter;
use async_trait::async_trait;
use sqlx::SqlitePool;
use stk_common::Result;

pub struct SiteImporter {
    pool: SqlitePool,
}

impl SiteImporter {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RowImporter for SiteImporter {
    type Payload = SitePayload;

    fn entity(&self) -> &'static str {
        "site"
    }

    fn prepare(&self, row: &ImportRow) -> std::result::Result<SitePayload, String> {
        let row = normalize_keys(row)?;

        Ok(SitePayload {
            code: mandatory_string(&row, "code")?,
            name: mandatory_string(&row, "name")?,
            address: field_string(&row, "address"),
        })
    }

    async fn find_existing(&self, payload: &SitePayload) -> Result<Option<i64>> {
        sites::find_site_id_by_code(&self.pool, &payload.code).await
    }

    fn natural_key_summary(&self, payload: &SitePayload) -> String {
        format!("code {}", payload.code)
    }

    async fn insert(&self, payload: &SitePayload) -> Result<i64> {
        sites::insert_site(&self.pool, payload).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sites::delete_site(&self.pool, id).await
    }

    async fn update(&self, existing_id: i64, payload: &SitePayload) -> Result<()> {
        sites::update_site(&self.pool, existing_id, payload).await
    }

    fn conflict_message(&self, column: Option<&str>, payload: &SitePayload) -> String {
        match column {
            Some("code") => format!("site code '{}' already exists", payload.code),
            _ => "a site with the same unique values already exists".to_string(),
        }
    }
}
