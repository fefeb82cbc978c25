use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{ProvisionError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "conString.json";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "connectionString")]
    pub connection_string: String,
}

/// Read the connection descriptor at `path` and return its connection string verbatim.
pub fn load_connection_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| ProvisionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Config = serde_json::from_slice(&data).map_err(|source| ProvisionError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("loaded connection descriptor from {}", path.display());
    Ok(config.connection_string)
}
