//! Database initialization
//!
//! Opens (or creates) the shared Stocktake SQLite database and creates the
//! inventory schema idempotently. Every table has its own `create_*_table`
//! function so tests can build exactly the subset they need.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    configure_connection(&pool).await?;
    create_all_tables(&pool).await?;

    Ok(pool)
}

/// Apply connection pragmas (foreign keys, WAL, busy timeout)
pub async fn configure_connection(pool: &SqlitePool) -> Result<()> {
    // Enforce referential integrity; assignment creation relies on it
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(pool).await?;

    Ok(())
}

/// Create the full inventory schema (idempotent, safe to call repeatedly)
pub async fn create_all_tables(pool: &SqlitePool) -> Result<()> {
    // Catalog tables referenced by descriptive composites
    create_vendors_table(pool).await?;
    create_memory_types_table(pool).await?;
    create_form_factors_table(pool).await?;
    create_drive_types_table(pool).await?;
    create_interfaces_table(pool).await?;
    create_cpu_models_table(pool).await?;
    create_ram_modules_table(pool).await?;
    create_storage_devices_table(pool).await?;

    // Aggregates
    create_sites_table(pool).await?;
    create_employees_table(pool).await?;
    create_assets_table(pool).await?;

    // Dependent records
    create_assignments_table(pool).await?;

    info!("Database tables initialized");

    Ok(())
}

pub async fn create_vendors_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS vendors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_memory_types_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS memory_types (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_form_factors_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS form_factors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_drive_types_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS drive_types (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_interfaces_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS interfaces (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_cpu_models_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cpu_models (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            vendor_id INTEGER NOT NULL REFERENCES vendors(id),
            model TEXT NOT NULL,
            UNIQUE(vendor_id, model)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_ram_modules_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ram_modules (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            capacity_gb INTEGER NOT NULL,
            memory_type_id INTEGER NOT NULL REFERENCES memory_types(id),
            speed_mhz INTEGER,
            form_factor_id INTEGER REFERENCES form_factors(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_storage_devices_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS storage_devices (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            capacity_gb INTEGER NOT NULL,
            drive_type_id INTEGER NOT NULL REFERENCES drive_types(id),
            interface_id INTEGER REFERENCES interfaces(id),
            form_factor_id INTEGER REFERENCES form_factors(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_sites_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sites (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            address TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_employees_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            full_name TEXT NOT NULL,
            start_date TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the assets table
///
/// `employee_id` is a denormalized reference column; the relational link to
/// employees is the assignments table, where the foreign key is enforced.
pub async fn create_assets_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS assets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            site_id INTEGER NOT NULL REFERENCES sites(id),
            asset_tag TEXT NOT NULL,
            serial_number TEXT UNIQUE,
            imei TEXT UNIQUE,
            status TEXT NOT NULL DEFAULT 'in stock',
            employee_id INTEGER,
            cpu_id INTEGER REFERENCES cpu_models(id),
            ram_id INTEGER REFERENCES ram_modules(id),
            storage_id INTEGER REFERENCES storage_devices(id),
            purchase_date TEXT,
            warranty_end TEXT,
            notes TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(site_id, asset_tag)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_assignments_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS assignments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            asset_id INTEGER NOT NULL REFERENCES assets(id),
            employee_id INTEGER NOT NULL REFERENCES employees(id),
            assigned_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
