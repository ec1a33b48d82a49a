//! Asset database operations
//!
//! The natural key is (site_id, asset_tag); serial number and IMEI are
//! additional unique columns enforced by the storage layer.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use stk_common::Result;

/// Prepared asset payload: the full field set persisted for one asset.
///
/// Built by the asset importer after normalization, resolution and status
/// inference; also the unit of exchange for duplicate confirmation, so it
/// round-trips through JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPayload {
    pub site_id: i64,
    pub asset_tag: String,
    pub serial_number: Option<String>,
    pub imei: Option<String>,
    pub status: String,
    pub employee_id: Option<i64>,
    pub cpu_id: Option<i64>,
    pub ram_id: Option<i64>,
    pub storage_id: Option<i64>,
    pub purchase_date: Option<String>,
    pub warranty_end: Option<String>,
    pub notes: Option<String>,
}

/// Look up an asset by its natural key. Exact equality only.
pub async fn find_asset_id_by_natural_key(
    pool: &SqlitePool,
    site_id: i64,
    asset_tag: &str,
) -> Result<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM assets WHERE site_id = ? AND asset_tag = ?",
    )
    .bind(site_id)
    .bind(asset_tag)
    .fetch_optional(pool)
    .await?;

    Ok(id)
}

/// Insert a new asset and return its surrogate ID
pub async fn insert_asset(pool: &SqlitePool, payload: &AssetPayload) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO assets (
            site_id, asset_tag, serial_number, imei, status, employee_id,
            cpu_id, ram_id, storage_id, purchase_date, warranty_end, notes
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.site_id)
    .bind(&payload.asset_tag)
    .bind(&payload.serial_number)
    .bind(&payload.imei)
    .bind(&payload.status)
    .bind(payload.employee_id)
    .bind(payload.cpu_id)
    .bind(payload.ram_id)
    .bind(payload.storage_id)
    .bind(&payload.purchase_date)
    .bind(&payload.warranty_end)
    .bind(&payload.notes)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Overwrite every field of an existing asset (not a merge)
pub async fn update_asset(pool: &SqlitePool, id: i64, payload: &AssetPayload) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE assets
        SET site_id = ?, asset_tag = ?, serial_number = ?, imei = ?, status = ?,
            employee_id = ?, cpu_id = ?, ram_id = ?, storage_id = ?,
            purchase_date = ?, warranty_end = ?, notes = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(payload.site_id)
    .bind(&payload.asset_tag)
    .bind(&payload.serial_number)
    .bind(&payload.imei)
    .bind(&payload.status)
    .bind(payload.employee_id)
    .bind(payload.cpu_id)
    .bind(payload.ram_id)
    .bind(payload.storage_id)
    .bind(&payload.purchase_date)
    .bind(&payload.warranty_end)
    .bind(&payload.notes)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete an asset (the compensating action after a failed dependent write)
pub async fn delete_asset(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM assets WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Load one asset payload back from the store
pub async fn load_asset_payload(pool: &SqlitePool, id: i64) -> Result<Option<AssetPayload>> {
    let row = sqlx::query_as::<_, (i64, String, Option<String>, Option<String>, String, Option<i64>, Option<i64>, Option<i64>, Option<i64>, Option<String>, Option<String>, Option<String>)>(
        r#"
        SELECT site_id, asset_tag, serial_number, imei, status, employee_id,
               cpu_id, ram_id, storage_id, purchase_date, warranty_end, notes
        FROM assets
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(
        |(site_id, asset_tag, serial_number, imei, status, employee_id, cpu_id, ram_id, storage_id, purchase_date, warranty_end, notes)| AssetPayload {
            site_id,
            asset_tag,
            serial_number,
            imei,
            status,
            employee_id,
            cpu_id,
            ram_id,
            storage_id,
            purchase_date,
            warranty_end,
            notes,
        },
    ))
}

/// Count all assets
pub async fn count_assets(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assets")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
