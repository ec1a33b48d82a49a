//! Site database operations. Natural key: code.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use stk_common::Result;

/// Prepared site payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePayload {
    pub code: String,
    pub name: String,
    pub address: Option<String>,
}

pub async fn find_site_id_by_code(pool: &SqlitePool, code: &str) -> Result<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM sites WHERE code = ?")
        .bind(code)
        .fetch_optional(pool)
        .await?;

    Ok(id)
}

pub async fn insert_site(pool: &SqlitePool, payload: &SitePayload) -> Result<i64> {
    let result = sqlx::query("INSERT INTO sites (code, name, address) VALUES (?, ?, ?)")
        .bind(&payload.code)
        .bind(&payload.name)
        .bind(&payload.address)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

pub async fn update_site(pool: &SqlitePool, id: i64, payload: &SitePayload) -> Result<()> {
    sqlx::query(
        "UPDATE sites SET code = ?, name = ?, address = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(&payload.code)
    .bind(&payload.name)
    .bind(&payload.address)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_site(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM sites WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
