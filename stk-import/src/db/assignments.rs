//! Assignment database operations
//!
//! Assignments link an asset to the employee holding it. They are created
//! only as a side effect of an asset creation whose payload carries an
//! employee reference; the employee foreign key is enforced here, so a
//! dangling reference fails the insert.

use sqlx::SqlitePool;
use stk_common::Result;

/// Create an assignment for a newly created asset
pub async fn insert_assignment(pool: &SqlitePool, asset_id: i64, employee_id: i64) -> Result<i64> {
    let result = sqlx::query("INSERT INTO assignments (asset_id, employee_id) VALUES (?, ?)")
        .bind(asset_id)
        .bind(employee_id)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Count assignments for one asset
pub async fn count_assignments_for_asset(pool: &SqlitePool, asset_id: i64) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assignments WHERE asset_id = ?")
        .bind(asset_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
