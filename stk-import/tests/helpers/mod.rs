//! Shared test utilities
//!
//! Builds an in-memory inventory database with the full schema and a small
//! seeded world: one site, one employee, and enough catalog entries to
//! exercise every descriptive composite.

use sqlx::SqlitePool;
use stk_import::ImportRow;

/// Seeded surrogate IDs, fixed by insertion order
pub const SITE_MADRID: i64 = 1;
pub const EMPLOYEE_ANA: i64 = 1;

pub async fn setup_inventory_db() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await.unwrap();
    stk_common::db::init::create_all_tables(&pool).await.unwrap();

    for sql in [
        "INSERT INTO sites (code, name) VALUES ('MAD', 'Madrid')",
        "INSERT INTO employees (email, full_name) VALUES ('ana@example.com', 'Ana Torres')",
        "INSERT INTO vendors (name) VALUES ('intel'), ('AMD')",
        "INSERT INTO memory_types (code) VALUES ('DDR4'), ('DDR5')",
        "INSERT INTO form_factors (code) VALUES ('DIMM'), ('SODIMM')",
        "INSERT INTO drive_types (code) VALUES ('SSD'), ('HDD')",
        "INSERT INTO interfaces (code) VALUES ('SATA'), ('PCIe')",
        "INSERT INTO cpu_models (vendor_id, model) VALUES (1, 'Core i7-1355U'), (2, 'Ryzen 7 7840U')",
        "INSERT INTO ram_modules (capacity_gb, memory_type_id, speed_mhz, form_factor_id) \
         VALUES (16, 1, NULL, NULL), (32, 2, 5600, 1)",
        "INSERT INTO storage_devices (capacity_gb, drive_type_id, interface_id, form_factor_id) \
         VALUES (512, 1, NULL, NULL), (1000, 2, 1, NULL)",
    ] {
        sqlx::query(sql).execute(&pool).await.unwrap();
    }

    pool
}

/// Build an import row from (column label, cell value) pairs
pub fn row(cells: &[(&str, serde_json::Value)]) -> ImportRow {
    cells.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}
