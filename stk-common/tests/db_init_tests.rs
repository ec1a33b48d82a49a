//! Tests for database initialization
//!
//! Covers automatic database creation, reopening an existing database, and
//! presence of the inventory schema after first run.

use sqlx::SqlitePool;
use stk_common::db::init::{create_all_tables, init_database};
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("stocktake.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("stocktake.db");

    // Create database first time
    let pool1 = init_database(&db_path).await;
    assert!(pool1.is_ok());
    drop(pool1);

    // Open database second time (should succeed)
    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
}

#[tokio::test]
async fn test_schema_contains_inventory_tables() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("stocktake.db");

    let pool = init_database(&db_path).await.unwrap();

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for expected in [
        "assets",
        "assignments",
        "cpu_models",
        "drive_types",
        "employees",
        "form_factors",
        "interfaces",
        "memory_types",
        "ram_modules",
        "sites",
        "storage_devices",
        "vendors",
    ] {
        assert!(tables.iter().any(|t| t == expected), "Missing table: {}", expected);
    }
}

#[tokio::test]
async fn test_create_all_tables_is_idempotent() {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();

    create_all_tables(&pool).await.unwrap();
    create_all_tables(&pool).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assets")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_asset_natural_key_is_unique() {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    create_all_tables(&pool).await.unwrap();

    sqlx::query("INSERT INTO sites (code, name) VALUES ('MAD', 'Madrid')")
        .execute(&pool)
        .await
        .unwrap();

    sqlx::query("INSERT INTO assets (site_id, asset_tag) VALUES (1, 'A1')")
        .execute(&pool)
        .await
        .unwrap();

    // Same site + tag must be rejected by the storage layer
    let dup = sqlx::query("INSERT INTO assets (site_id, asset_tag) VALUES (1, 'A1')")
        .execute(&pool)
        .await;
    assert!(dup.is_err(), "Duplicate (site_id, asset_tag) insert should fail");
}
