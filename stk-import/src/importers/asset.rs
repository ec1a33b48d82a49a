//! Asset importer
//!
//! The richest importer in the suite: besides the natural key
//! (site + tag) it carries serial number, IMEI, lifecycle status, an
//! employee reference, purchase/warranty dates, and three descriptive
//! hardware composites that resolve against the catalog snapshot. An
//! employee reference implies an assignment record, created right after
//! the asset and compensated by deleting the asset if it fails.

use crate::db::assets::{self, AssetPayload};
use crate::db::assignments;
use crate::db::catalog::CatalogSnapshot;
use crate::importers::{field_i64, field_string, mandatory_i64, mandatory_string};
use crate::models::ImportRow;
use crate::services::date_normalizer::normalize_date;
use crate::services::field_normalizer::normalize_keys;
use crate::services::import_engine::RowImporter;
use crate::services::reference_resolver::{resolve_cpu, resolve_ram, resolve_storage, RamRef, StorageRef};
use async_trait::async_trait;
use sqlx::SqlitePool;
use stk_common::Result;

pub const STATUS_ASSIGNED: &str = "assigned";
pub const STATUS_IN_STOCK: &str = "in stock";

/// Derive the lifecycle status when the row does not state one.
/// Explicit values always win.
pub fn infer_status(explicit: Option<String>, has_employee: bool) -> String {
    match explicit {
        Some(status) => status,
        None if has_employee => STATUS_ASSIGNED.to_string(),
        None => STATUS_IN_STOCK.to_string(),
    }
}

pub struct AssetImporter {
    pool: SqlitePool,
    catalogs: CatalogSnapshot,
}

impl AssetImporter {
    /// Build an importer for one batch, preloading the catalog snapshot
    pub async fn load(pool: SqlitePool) -> Result<Self> {
        let catalogs = CatalogSnapshot::load(&pool).await?;
        Ok(Self { pool, catalogs })
    }

    fn resolve_cpu_field(
        &self,
        row: &ImportRow,
        unresolved: &mut Vec<String>,
    ) -> Option<i64> {
        let vendor = field_string(row, "cpuVendor");
        let model = field_string(row, "cpuModel");
        match (vendor, model) {
            (None, None) => None,
            (Some(vendor), Some(model)) => match resolve_cpu(&self.catalogs, &vendor, &model) {
                Ok(id) => Some(id),
                Err(e) => {
                    unresolved.push(e.to_string());
                    None
                }
            },
            (vendor, model) => {
                let present = vendor.or(model).unwrap_or_default();
                unresolved.push(format!(
                    "CPU reference needs both vendor and model (got only \"{}\")",
                    present
                ));
                None
            }
        }
    }

    fn resolve_ram_field(
        &self,
        row: &ImportRow,
        unresolved: &mut Vec<String>,
    ) -> std::result::Result<Option<i64>, String> {
        let capacity = field_i64(row, "ramCapacityGb")?;
        let memory_type = field_string(row, "ramType");
        let speed_mhz = field_i64(row, "ramSpeedMhz")?;
        let form_factor = field_string(row, "ramFormFactor");

        if capacity.is_none() && memory_type.is_none() && speed_mhz.is_none() && form_factor.is_none() {
            return Ok(None);
        }
        let (Some(capacity_gb), Some(memory_type)) = (capacity, memory_type) else {
            unresolved.push("RAM reference needs at least capacity and memory type".to_string());
            return Ok(None);
        };

        match resolve_ram(
            &self.catalogs,
            &RamRef { capacity_gb, memory_type, speed_mhz, form_factor },
        ) {
            Ok(id) => Ok(Some(id)),
            Err(e) => {
                unresolved.push(e.to_string());
                Ok(None)
            }
        }
    }

    fn resolve_storage_field(
        &self,
        row: &ImportRow,
        unresolved: &mut Vec<String>,
    ) -> std::result::Result<Option<i64>, String> {
        let capacity = field_i64(row, "storageCapacityGb")?;
        let drive_type = field_string(row, "storageType");
        let interface = field_string(row, "storageInterface");
        let form_factor = field_string(row, "storageFormFactor");

        if capacity.is_none() && drive_type.is_none() && interface.is_none() && form_factor.is_none() {
            return Ok(None);
        }
        let (Some(capacity_gb), Some(drive_type)) = (capacity, drive_type) else {
            unresolved.push("storage reference needs at least capacity and drive type".to_string());
            return Ok(None);
        };

        match resolve_storage(
            &self.catalogs,
            &StorageRef { capacity_gb, drive_type, interface, form_factor },
        ) {
            Ok(id) => Ok(Some(id)),
            Err(e) => {
                unresolved.push(e.to_string());
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl RowImporter for AssetImporter {
    type Payload = AssetPayload;

    fn entity(&self) -> &'static str {
        "asset"
    }

    fn prepare(&self, row: &ImportRow) -> std::result::Result<AssetPayload, String> {
        let row = normalize_keys(row)?;

        let site_id = mandatory_i64(&row, "siteId")?;
        let asset_tag = mandatory_string(&row, "assetTag")?;

        let serial_number = field_string(&row, "serialNumber");
        let imei = field_string(&row, "imei");
        let employee_id = field_i64(&row, "employeeId")?;
        let notes = field_string(&row, "notes");

        // Date columns are optional; unparseable values are dropped
        let purchase_date = row.get("purchaseDate").and_then(normalize_date);
        let warranty_end = row.get("warrantyEnd").and_then(normalize_date);

        // The row runs through every resolver so the operator sees all
        // unresolved composites at once, then yields a single error
        let mut unresolved = Vec::new();
        let cpu_id = self.resolve_cpu_field(&row, &mut unresolved);
        let ram_id = self.resolve_ram_field(&row, &mut unresolved)?;
        let storage_id = self.resolve_storage_field(&row, &mut unresolved)?;
        if !unresolved.is_empty() {
            return Err(unresolved.join("; "));
        }

        let status = infer_status(field_string(&row, "status"), employee_id.is_some());

        Ok(AssetPayload {
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
        })
    }

    async fn find_existing(&self, payload: &AssetPayload) -> Result<Option<i64>> {
        assets::find_asset_id_by_natural_key(&self.pool, payload.site_id, &payload.asset_tag).await
    }

    fn natural_key_summary(&self, payload: &AssetPayload) -> String {
        format!("site {} / tag {}", payload.site_id, payload.asset_tag)
    }

    async fn insert(&self, payload: &AssetPayload) -> Result<i64> {
        assets::insert_asset(&self.pool, payload).await
    }

    fn needs_dependent(&self, payload: &AssetPayload) -> bool {
        payload.employee_id.is_some()
    }

    async fn create_dependent(&self, new_id: i64, payload: &AssetPayload) -> Result<()> {
        if let Some(employee_id) = payload.employee_id {
            assignments::insert_assignment(&self.pool, new_id, employee_id).await?;
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        assets::delete_asset(&self.pool, id).await
    }

    async fn update(&self, existing_id: i64, payload: &AssetPayload) -> Result<()> {
        assets::update_asset(&self.pool, existing_id, payload).await
    }

    fn conflict_message(&self, column: Option<&str>, payload: &AssetPayload) -> String {
        match column {
            Some("site_id") | Some("asset_tag") => format!(
                "tag '{}' is already in use at site {}",
                payload.asset_tag, payload.site_id
            ),
            Some("serial_number") => format!(
                "serial number '{}' is already registered",
                payload.serial_number.as_deref().unwrap_or("")
            ),
            Some("imei") => format!(
                "IMEI '{}' is already registered",
                payload.imei.as_deref().unwrap_or("")
            ),
            _ => "an asset with the same unique values already exists".to_string(),
        }
    }
}
