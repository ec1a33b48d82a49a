//! Descriptive reference resolution
//!
//! Maps the human-written hardware composites on a row (CPU vendor + model,
//! RAM capacity + type + optional speed/form factor, storage capacity +
//! drive type + optional interface/form factor) to catalog surrogate IDs
//! using the preloaded [`CatalogSnapshot`].
//!
//! Matching is case-insensitive exact equality on every supplied sub-field.
//! An omitted optional sub-field is not a wildcard: the candidate's column
//! must be empty. No match and ambiguous match are both explicit row-scoped
//! errors; the resolver never picks an arbitrary candidate.

use crate::db::catalog::CatalogSnapshot;
use thiserror::Error;

/// Why a descriptive composite failed to resolve
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("{composite} matched no catalog entry")]
    NotFound { composite: String },

    #[error("{composite} matched {count} catalog entries; refine the reference")]
    Ambiguous { composite: String, count: usize },
}

/// RAM composite as written on the row
#[derive(Debug, Clone)]
pub struct RamRef {
    pub capacity_gb: i64,
    pub memory_type: String,
    pub speed_mhz: Option<i64>,
    pub form_factor: Option<String>,
}

/// Storage composite as written on the row
#[derive(Debug, Clone)]
pub struct StorageRef {
    pub capacity_gb: i64,
    pub drive_type: String,
    pub interface: Option<String>,
    pub form_factor: Option<String>,
}

/// Resolve a CPU reference (vendor name + model text)
pub fn resolve_cpu(
    catalogs: &CatalogSnapshot,
    vendor: &str,
    model: &str,
) -> Result<i64, ResolveError> {
    let composite = format!("CPU \"{} {}\"", vendor.trim(), model.trim());

    let vendor_id = catalogs
        .vendor_id(vendor)
        .ok_or_else(|| ResolveError::NotFound { composite: composite.clone() })?;

    let model_folded = model.trim().to_lowercase();
    let matches: Vec<i64> = catalogs
        .cpu_models()
        .iter()
        .filter(|c| c.vendor_id == vendor_id && c.model == model_folded)
        .map(|c| c.id)
        .collect();

    single_match(matches, composite)
}

/// Resolve a RAM reference
pub fn resolve_ram(catalogs: &CatalogSnapshot, reference: &RamRef) -> Result<i64, ResolveError> {
    let composite = ram_composite(reference);

    let memory_type_id = catalogs
        .memory_type_id(&reference.memory_type)
        .ok_or_else(|| ResolveError::NotFound { composite: composite.clone() })?;

    let form_factor_id = match &reference.form_factor {
        Some(code) => Some(
            catalogs
                .form_factor_id(code)
                .ok_or_else(|| ResolveError::NotFound { composite: composite.clone() })?,
        ),
        None => None,
    };

    let matches: Vec<i64> = catalogs
        .ram_modules()
        .iter()
        .filter(|m| {
            m.capacity_gb == reference.capacity_gb
                && m.memory_type_id == memory_type_id
                && m.speed_mhz == reference.speed_mhz
                && m.form_factor_id == form_factor_id
        })
        .map(|m| m.id)
        .collect();

    single_match(matches, composite)
}

/// Resolve a storage reference
pub fn resolve_storage(
    catalogs: &CatalogSnapshot,
    reference: &StorageRef,
) -> Result<i64, ResolveError> {
    let composite = storage_composite(reference);

    let drive_type_id = catalogs
        .drive_type_id(&reference.drive_type)
        .ok_or_else(|| ResolveError::NotFound { composite: composite.clone() })?;

    let interface_id = match &reference.interface {
        Some(code) => Some(
            catalogs
                .interface_id(code)
                .ok_or_else(|| ResolveError::NotFound { composite: composite.clone() })?,
        ),
        None => None,
    };

    let form_factor_id = match &reference.form_factor {
        Some(code) => Some(
            catalogs
                .form_factor_id(code)
                .ok_or_else(|| ResolveError::NotFound { composite: composite.clone() })?,
        ),
        None => None,
    };

    let matches: Vec<i64> = catalogs
        .storage_devices()
        .iter()
        .filter(|d| {
            d.capacity_gb == reference.capacity_gb
                && d.drive_type_id == drive_type_id
                && d.interface_id == interface_id
                && d.form_factor_id == form_factor_id
        })
        .map(|d| d.id)
        .collect();

    single_match(matches, composite)
}

fn single_match(matches: Vec<i64>, composite: String) -> Result<i64, ResolveError> {
    match matches.as_slice() {
        [] => Err(ResolveError::NotFound { composite }),
        [id] => Ok(*id),
        _ => Err(ResolveError::Ambiguous { composite, count: matches.len() }),
    }
}

fn ram_composite(reference: &RamRef) -> String {
    let mut text = format!("{}GB {}", reference.capacity_gb, reference.memory_type.trim());
    if let Some(speed) = reference.speed_mhz {
        text.push_str(&format!(" {}MHz", speed));
    }
    if let Some(ff) = &reference.form_factor {
        text.push(' ');
        text.push_str(ff.trim());
    }
    format!("RAM \"{}\"", text)
}

fn storage_composite(reference: &StorageRef) -> String {
    let mut text = format!("{}GB {}", reference.capacity_gb, reference.drive_type.trim());
    if let Some(interface) = &reference.interface {
        text.push(' ');
        text.push_str(interface.trim());
    }
    if let Some(ff) = &reference.form_factor {
        text.push(' ');
        text.push_str(ff.trim());
    }
    format!("storage \"{}\"", text)
}
