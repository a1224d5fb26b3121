//! Configuration loading from file and environment.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{
    CompendiumError, CompendiumResult, DEFAULT_BUFFER_ROWS, DEFAULT_CHUNK_SIZE, DEFAULT_ROW_HEIGHT,
};
use crate::viewport::Viewport;

/// Environment variable naming a TOML config file.
pub const CONFIG_ENV_VAR: &str = "COMPENDIUM_CONFIG";

/// Tunables for the search worker and the result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompendiumConfig {
    /// Height of one result row, in pixels.
    #[serde(default = "default_row_height")]
    pub row_height: u32,
    /// Rows rendered above and below the visible window.
    #[serde(default = "default_buffer_rows")]
    pub buffer_rows: usize,
    /// Entries per `results-chunk` message.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_row_height() -> u32 {
    DEFAULT_ROW_HEIGHT
}

fn default_buffer_rows() -> usize {
    DEFAULT_BUFFER_ROWS
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for CompendiumConfig {
    fn default() -> Self {
        Self {
            row_height: default_row_height(),
            buffer_rows: default_buffer_rows(),
            chunk_size: default_chunk_size(),
        }
    }
}

impl CompendiumConfig {
    /// Parse a config from TOML text. Zero row height or chunk size fall
    /// back to their defaults.
    pub fn from_toml_str(text: &str) -> CompendiumResult<Self> {
        let mut config: Self = toml::from_str(text)
            .map_err(|e| CompendiumError::Config(format!("Failed to parse config: {e}")))?;
        if config.row_height == 0 {
            log::warn!("row_height must be positive; using {DEFAULT_ROW_HEIGHT}");
            config.row_height = DEFAULT_ROW_HEIGHT;
        }
        if config.chunk_size == 0 {
            log::warn!("chunk_size must be positive; using {DEFAULT_CHUNK_SIZE}");
            config.chunk_size = DEFAULT_CHUNK_SIZE;
        }
        Ok(config)
    }

    /// The viewport geometry described by this config.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.row_height, self.buffer_rows)
    }
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> CompendiumResult<CompendiumConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        CompendiumError::Io(std::io::Error::other(format!(
            "Failed to read config file {}: {e}",
            path.display()
        )))
    })?;
    CompendiumConfig::from_toml_str(&text)
}

/// Resolve configuration using priority order:
/// 1. Explicit path (CLI arg)
/// 2. `COMPENDIUM_CONFIG` environment variable
/// 3. Built-in defaults
pub fn resolve_config(explicit: Option<&Path>) -> CompendiumResult<CompendiumConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        if !env_path.trim().is_empty() {
            return load_config(Path::new(env_path.trim()));
        }
    }
    Ok(CompendiumConfig::default())
}
