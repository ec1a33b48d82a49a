//! Configuration loading and data directory resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Database file name inside the data directory
pub const DATABASE_FILE: &str = "stocktake.db";

/// Data directory resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_dir(cli_arg: Option<&str>, env_var_name: &str) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(PathBuf::from(path));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        return Ok(PathBuf::from(path));
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(data_dir) = config.get("data_dir").and_then(|v| v.as_str()) {
                    return Ok(PathBuf::from(data_dir));
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    Ok(default_data_dir())
}

/// Create the data directory if missing and return the database path
pub fn ensure_data_dir(data_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(data_dir)
        .map_err(|e| Error::Config(format!("Cannot create data directory {:?}: {}", data_dir, e)))?;
    Ok(data_dir.join(DATABASE_FILE))
}

/// Get configuration file path for the platform
fn locate_config_file() -> Result<PathBuf> {
    let config_path = if cfg!(target_os = "linux") {
        // Try ~/.config/stocktake/config.toml first, then /etc/stocktake/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("stocktake").join("config.toml"));
        let system_config = PathBuf::from("/etc/stocktake/config.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    } else {
        dirs::config_dir()
            .map(|d| d.join("stocktake").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?
    };

    if config_path.exists() {
        Ok(config_path)
    } else {
        Err(Error::Config(format!("Config file not found: {:?}", config_path)))
    }
}

/// Get OS-dependent default data directory path
fn default_data_dir() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("stocktake"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/stocktake"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("stocktake"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/stocktake"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("stocktake"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\stocktake"))
    } else {
        PathBuf::from("./stocktake_data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_argument_wins() {
        let dir = resolve_data_dir(Some("/srv/inventory"), "STOCKTAKE_TEST_UNSET").unwrap();
        assert_eq!(dir, PathBuf::from("/srv/inventory"));
    }

    #[test]
    fn env_var_beats_default() {
        std::env::set_var("STOCKTAKE_TEST_DATA", "/opt/stk");
        let dir = resolve_data_dir(None, "STOCKTAKE_TEST_DATA").unwrap();
        std::env::remove_var("STOCKTAKE_TEST_DATA");
        assert_eq!(dir, PathBuf::from("/opt/stk"));
    }

    #[test]
    fn database_path_under_data_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = ensure_data_dir(tmp.path()).unwrap();
        assert_eq!(db_path, tmp.path().join(DATABASE_FILE));
    }
}
