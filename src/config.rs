//! Runtime configuration.
//!
//! Values come from command-line flags with environment fallbacks (see
//! `cli.rs` in the binary); this module holds the resolved form and its
//! defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::fields::Locale;
use crate::gateway::DEFAULT_TIMEOUT;
use crate::store::DEFAULT_PAGE_SIZE;

pub const DEFAULT_API_URL: &str = "https://dummyjson.com";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API URL must not be empty")]
    EmptyApiUrl,

    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    #[error("page size must be greater than zero")]
    ZeroPageSize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
    pub api_url: String,
    pub timeout: Duration,
    pub page_size: u64,
    pub data_dir: PathBuf,
    pub locale: Locale,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
            data_dir: default_data_dir(),
            locale: Locale::En,
        }
    }
}

impl HubConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::EmptyApiUrl);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(())
    }
}

/// `$HOME/.hub`, or `./.hub` when `HOME` is unset.
pub fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".hub")
}
