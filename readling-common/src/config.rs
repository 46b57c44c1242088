//! Configuration file resolution and loading
//!
//! Services resolve their TOML configuration following the priority order:
//! 1. Environment variables (handled per-service)
//! 2. TOML config file (user config dir, then system dir)
//! 3. Compiled defaults (handled per-service)
//!
//! This module provides the shared file-resolution and parsing half; each
//! service layers its own environment overrides and defaults on top.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve the config file path for a service, e.g. `readling-de` →
/// `~/.config/readling/readling-de.toml`.
///
/// Returns the user config path if it exists, then the system path
/// (`/etc/readling/<service>.toml` on Unix), then `None`.
pub fn config_file_path(service_name: &str) -> Option<PathBuf> {
    let file_name = format!("{}.toml", service_name);

    if let Some(dir) = dirs::config_dir() {
        let user_path = dir.join("readling").join(&file_name);
        if user_path.exists() {
            return Some(user_path);
        }
    }

    if cfg!(unix) {
        let system_path = PathBuf::from("/etc/readling").join(&file_name);
        if system_path.exists() {
            return Some(system_path);
        }
    }

    None
}

/// Load and parse a service's TOML config file if one exists.
///
/// A missing file is not an error (services fall back to environment
/// variables and compiled defaults); a malformed file is.
pub fn load_config<T: DeserializeOwned>(service_name: &str) -> Result<Option<T>> {
    let Some(path) = config_file_path(service_name) else {
        debug!("No config file found for {}", service_name);
        return Ok(None);
    };
    let parsed = read_config(&path)?;
    debug!("Loaded config for {} from {}", service_name, path.display());
    Ok(Some(parsed))
}

/// Read and parse a TOML config file at an explicit path.
pub fn read_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Write a TOML config file, creating parent directories as needed.
///
/// Writes to a sibling temp file first and renames over the target so a
/// crashed writer never leaves a half-written config behind.
pub fn write_config<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(value)
        .map_err(|e| Error::Config(format!("Serialize config failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct SampleConfig {
        name: String,
        threshold: f32,
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.toml");
        let config = SampleConfig {
            name: "readling-de".to_string(),
            threshold: 0.85,
        };

        write_config(&config, &path).unwrap();
        let loaded: SampleConfig = read_config(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/sample.toml");
        let config = SampleConfig {
            name: "x".to_string(),
            threshold: 0.5,
        };

        write_config(&config, &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "name = [unterminated").unwrap();

        let result: Result<SampleConfig> = read_config(&path);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
