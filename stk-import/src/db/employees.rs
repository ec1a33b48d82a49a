//! Employee database operations. Natural key: email.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use stk_common::Result;

/// Prepared employee payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayload {
    pub email: String,
    pub full_name: String,
    pub start_date: Option<String>,
}

pub async fn find_employee_id_by_email(pool: &SqlitePool, email: &str) -> Result<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM employees WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(id)
}

pub async fn insert_employee(pool: &SqlitePool, payload: &EmployeePayload) -> Result<i64> {
    let result = sqlx::query("INSERT INTO employees (email, full_name, start_date) VALUES (?, ?, ?)")
        .bind(&payload.email)
        .bind(&payload.full_name)
        .bind(&payload.start_date)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

pub async fn update_employee(pool: &SqlitePool, id: i64, payload: &EmployeePayload) -> Result<()> {
    sqlx::query(
        "UPDATE employees SET email = ?, full_name = ?, start_date = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(&payload.email)
    .bind(&payload.full_name)
    .bind(&payload.start_date)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_employee(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
