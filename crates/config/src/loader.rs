//! Config file discovery and loading.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{ConfigError, schema::ModelConfig};

/// Standard config file name, checked in the working directory.
const CONFIG_FILENAME: &str = "pagekit.toml";

/// Environment variable holding an explicit config file path.
const CONFIG_ENV: &str = "PAGEKIT_CONFIG";

/// Load and validate config from the given TOML file.
pub fn load_config(path: &Path) -> Result<ModelConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let config: ModelConfig = toml::from_str(&raw).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        source: e,
    })?;
    config.validate()?;
    Ok(config)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `$PAGEKIT_CONFIG` (explicit path)
/// 2. `./pagekit.toml` (project-local)
///
/// Returns `ModelConfig::default()` if no config file is found or the
/// file fails to load.
pub fn discover_and_load() -> ModelConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    ModelConfig::default()
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        let p = PathBuf::from(path);
        if p.exists() {
            return Some(p);
        }
    }

    let p = PathBuf::from(CONFIG_FILENAME);
    if p.exists() {
        return Some(p);
    }

    None
}
