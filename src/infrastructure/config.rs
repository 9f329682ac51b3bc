//! Loading the component configuration at startup

use core::fmt;
use std::{env, fs, io, path::PathBuf};

use crate::config::{CONFIG_PATH_ENV, ComponentConfig};

#[derive(Debug)]
pub enum ConfigLoadError {
    Read { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigLoadError::Read { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            ConfigLoadError::Parse { path, source } => {
                write!(f, "failed to parse {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigLoadError {}

/// Config file location: `NEOPIXEL_CONFIG`, else the first CLI argument
pub fn config_path() -> Option<PathBuf> {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .or_else(|| env::args_os().nth(1).map(PathBuf::from))
}

/// Read the component config, falling back to defaults when no file is given
pub fn load_component_config() -> Result<ComponentConfig, ConfigLoadError> {
    match config_path() {
        Some(path) => read_component_config(path),
        None => {
            log::info!("config: no config file given, using defaults");
            Ok(ComponentConfig::default())
        }
    }
}

pub fn read_component_config(path: PathBuf) -> Result<ComponentConfig, ConfigLoadError> {
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(source) => return Err(ConfigLoadError::Read { path, source }),
    };
    let config = match serde_json::from_str(&raw) {
        Ok(config) => config,
        Err(source) => return Err(ConfigLoadError::Parse { path, source }),
    };
    log::info!("config: loaded {}", path.display());
    Ok(config)
}
