//! # Configuration Utilities
//!
//! TOML configuration for the exchange client. Every key has a default, so a
//! missing section (or a missing file, see the `client` binary) is fine.
//!
//! ```toml
//! [endpoint]
//! base_url = "http://localhost:8080"
//! contract = "binary"
//!
//! [output]
//! path = "processed.png"
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::contract::Contract;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: ExchangeConfig = load_config("config/client.toml")?;
/// ```
pub fn load_config<T>(path: impl AsRef<Path>) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Where the backend lives and which contract it speaks
    pub endpoint: EndpointConfig,
    /// Where the CLI writes the processed image
    pub output: OutputConfig,
}

/// Backend location.
///
/// Only the base URL is configurable; the path is fixed by the contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Scheme, host and port of the backend (e.g., "http://localhost:8080")
    pub base_url: String,
    /// Response contract
    pub contract: Contract,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            contract: Contract::default(),
        }
    }
}

impl EndpointConfig {
    /// Full URL the upload is posted to.
    pub fn url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.contract.path()
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("processed.png"),
        }
    }
}

impl ExchangeConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        load_config(path)
    }
}
