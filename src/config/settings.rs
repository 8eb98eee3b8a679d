//! Application settings loaded from `config.toml`.
//!
//! Every section is optional; anything left out falls back to the defaults below.
//!
//! ```toml
//! [purchasing]
//! default_price_ceiling = 1000.0
//!
//! [pagination]
//! per_page = 10
//!
//! [admin]
//! name = "Administrator"
//! email = "admin@example.com"
//! ```

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

const CONFIG_PATH_VAR: &str = "SCRAP_LEDGER_CONFIG";

/// Top-level settings structure representing the whole config.toml file
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    /// Purchase pricing defaults
    pub purchasing: PurchasingSettings,
    /// Listing defaults
    pub pagination: PaginationSettings,
    /// Administrator account seeded on `init`
    pub admin: AdminSettings,
}

/// Purchase pricing defaults
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PurchasingSettings {
    /// Ceiling assigned to suppliers created without one
    pub default_price_ceiling: f64,
}

impl Default for PurchasingSettings {
    fn default() -> Self {
        Self {
            default_price_ceiling: 1000.0,
        }
    }
}

/// Listing defaults
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PaginationSettings {
    /// Rows per page for paginated listings
    pub per_page: u64,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self { per_page: 10 }
    }
}

/// Administrator account seeded on `init`
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AdminSettings {
    /// Display name
    pub name: String,
    /// Login e-mail
    pub email: String,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            name: "Administrator".to_string(),
            email: "admin@example.com".to_string(),
        }
    }
}

impl Settings {
    fn validate(self) -> Result<Self> {
        let ceiling = self.purchasing.default_price_ceiling;
        if !ceiling.is_finite() || ceiling < 0.0 {
            return Err(Error::Config {
                message: format!("default_price_ceiling must be a non-negative number, got {ceiling}"),
            });
        }
        if self.pagination.per_page == 0 {
            return Err(Error::Config {
                message: "per_page must be at least 1".to_string(),
            });
        }
        Ok(self)
    }
}

/// Parses settings from TOML text.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    settings.validate()
}

/// Loads settings from a TOML file.
///
/// A missing file is not an error: the defaults are returned instead.
///
/// # Errors
/// Returns an error if the file exists but cannot be read, is not valid TOML,
/// or holds out-of-range values.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!(path = %path.display(), "no config file found, using defaults");
        return Ok(Settings::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;
    parse_settings(&contents)
}

/// Loads settings from `$SCRAP_LEDGER_CONFIG`, or `./config.toml` when unset.
pub fn load_default_settings() -> Result<Settings> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config.toml".to_string());
    load_settings(path)
}
