//! Configuration file discovery and loading

use std::path::{Path, PathBuf};

use super::EngineConfig;
use crate::{FixpointError, Result};

/// Config file names in lookup priority order
const CONFIG_FILE_NAMES: &[&str] = &[
    ".fixpointrc.toml",
    "fixpoint.toml",
    "fixpoint.json",
    "fixpoint.yaml",
    "fixpoint.yml",
];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Find a config file in `start_path` or any of its ancestors
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| FixpointError::io_error(start_path, e))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load a config file, choosing the format by extension
    pub fn load_from_file(path: &Path) -> Result<EngineConfig> {
        let content =
            std::fs::read_to_string(path).map_err(|e| FixpointError::io_error(path, e))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let config = match extension {
            "toml" => EngineConfig::from_toml_str(&content),
            "json" => EngineConfig::from_json_str(&content),
            "yaml" | "yml" => EngineConfig::from_yaml_str(&content),
            other => Err(FixpointError::config_error(format!(
                "Unsupported config format '{other}'"
            ))),
        };

        config.map_err(|e| match e {
            FixpointError::ConfigError { message } => FixpointError::config_error(format!(
                "Failed to load config from '{}': {}",
                path.display(),
                message
            )),
            other => other,
        })
    }

    /// Load from an explicit path, or discover one upward from `start_dir`;
    /// defaults when nothing is found
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<EngineConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(FixpointError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(EngineConfig::default())
            }
        }
    }
}
