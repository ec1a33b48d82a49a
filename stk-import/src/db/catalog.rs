//! Catalog snapshot for descriptive reference resolution
//!
//! Rows reference hardware by descriptive text (vendor + model, capacity +
//! type codes), not by surrogate IDs. Resolving those per row against the
//! database would cost one query per field per row; instead every referenced
//! catalog is preloaded once per batch into case-folded in-memory tables.
//! The snapshot is read-only for the batch's lifetime and is threaded
//! through the pipeline by reference.

use sqlx::SqlitePool;
use std::collections::HashMap;
use stk_common::Result;

#[derive(Debug, Clone)]
pub struct CpuModelRow {
    pub id: i64,
    pub vendor_id: i64,
    /// Case-folded model text
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct RamModuleRow {
    pub id: i64,
    pub capacity_gb: i64,
    pub memory_type_id: i64,
    pub speed_mhz: Option<i64>,
    pub form_factor_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct StorageDeviceRow {
    pub id: i64,
    pub capacity_gb: i64,
    pub drive_type_id: i64,
    pub interface_id: Option<i64>,
    pub form_factor_id: Option<i64>,
}

/// Per-batch, read-only view of every catalog the resolver consults.
///
/// Code tables are keyed by case-folded text; hardware tables are scanned
/// with the resolved code IDs.
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    vendors: HashMap<String, i64>,
    memory_types: HashMap<String, i64>,
    form_factors: HashMap<String, i64>,
    drive_types: HashMap<String, i64>,
    interfaces: HashMap<String, i64>,
    cpu_models: Vec<CpuModelRow>,
    ram_modules: Vec<RamModuleRow>,
    storage_devices: Vec<StorageDeviceRow>,
}

impl CatalogSnapshot {
    /// Load every catalog once; one query per table
    pub async fn load(pool: &SqlitePool) -> Result<Self> {
        let vendors = load_code_table(pool, "SELECT id, name FROM vendors").await?;
        let memory_types = load_code_table(pool, "SELECT id, code FROM memory_types").await?;
        let form_factors = load_code_table(pool, "SELECT id, code FROM form_factors").await?;
        let drive_types = load_code_table(pool, "SELECT id, code FROM drive_types").await?;
        let interfaces = load_code_table(pool, "SELECT id, code FROM interfaces").await?;

        let cpu_models = sqlx::query_as::<_, (i64, i64, String)>(
            "SELECT id, vendor_id, model FROM cpu_models",
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|(id, vendor_id, model)| CpuModelRow {
            id,
            vendor_id,
            model: model.to_lowercase(),
        })
        .collect();

        let ram_modules = sqlx::query_as::<_, (i64, i64, i64, Option<i64>, Option<i64>)>(
            "SELECT id, capacity_gb, memory_type_id, speed_mhz, form_factor_id FROM ram_modules",
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|(id, capacity_gb, memory_type_id, speed_mhz, form_factor_id)| RamModuleRow {
            id,
            capacity_gb,
            memory_type_id,
            speed_mhz,
            form_factor_id,
        })
        .collect();

        let storage_devices = sqlx::query_as::<_, (i64, i64, i64, Option<i64>, Option<i64>)>(
            "SELECT id, capacity_gb, drive_type_id, interface_id, form_factor_id FROM storage_devices",
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|(id, capacity_gb, drive_type_id, interface_id, form_factor_id)| StorageDeviceRow {
            id,
            capacity_gb,
            drive_type_id,
            interface_id,
            form_factor_id,
        })
        .collect();

        let snapshot = Self {
            vendors,
            memory_types,
            form_factors,
            drive_types,
            interfaces,
            cpu_models,
            ram_modules,
            storage_devices,
        };

        tracing::debug!(
            vendors = snapshot.vendors.len(),
            cpu_models = snapshot.cpu_models.len(),
            ram_modules = snapshot.ram_modules.len(),
            storage_devices = snapshot.storage_devices.len(),
            "Catalog snapshot loaded"
        );

        Ok(snapshot)
    }

    pub fn vendor_id(&self, name: &str) -> Option<i64> {
        self.vendors.get(&name.trim().to_lowercase()).copied()
    }

    pub fn memory_type_id(&self, code: &str) -> Option<i64> {
        self.memory_types.get(&code.trim().to_lowercase()).copied()
    }

    pub fn form_factor_id(&self, code: &str) -> Option<i64> {
        self.form_factors.get(&code.trim().to_lowercase()).copied()
    }

    pub fn drive_type_id(&self, code: &str) -> Option<i64> {
        self.drive_types.get(&code.trim().to_lowercase()).copied()
    }

    pub fn interface_id(&self, code: &str) -> Option<i64> {
        self.interfaces.get(&code.trim().to_lowercase()).copied()
    }

    pub fn cpu_models(&self) -> &[CpuModelRow] {
        &self.cpu_models
    }

    pub fn ram_modules(&self) -> &[RamModuleRow] {
        &self.ram_modules
    }

    pub fn storage_devices(&self) -> &[StorageDeviceRow] {
        &self.storage_devices
    }
}

async fn load_code_table(pool: &SqlitePool, sql: &str) -> Result<HashMap<String, i64>> {
    let rows = sqlx::query_as::<_, (i64, String)>(sql).fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(|(id, text)| (text.to_lowercase(), id))
        .collect())
}
