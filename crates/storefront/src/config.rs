//! Shop configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `SHOP_STORAGE_DIR` - Directory for persisted state (default: `.corner-shop`)
//! - `SHOP_LOG_FORMAT` - `pretty` or `json` (default: `pretty`)
//! - `SHOP_CURRENCY` - ISO 4217 code used when formatting prices (default: `USD`)

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use corner_shop_core::CurrencyCode;

const DEFAULT_STORAGE_DIR: &str = ".corner-shop";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `pretty` or `json`, got `{other}`")),
        }
    }
}

/// Shop configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopConfig {
    /// Directory holding one JSON file per storage key
    pub storage_dir: PathBuf,
    /// Log output format
    pub log_format: LogFormat,
    /// Currency used when displaying prices
    pub currency: CurrencyCode,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            log_format: LogFormat::default(),
            currency: CurrencyCode::default(),
        }
    }
}

impl ShopConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let storage_dir = lookup("SHOP_STORAGE_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map_or(defaults.storage_dir, PathBuf::from);
        let log_format = parse_optional(&lookup, "SHOP_LOG_FORMAT")?.unwrap_or(defaults.log_format);
        let currency = parse_optional(&lookup, "SHOP_CURRENCY")?.unwrap_or(defaults.currency);

        Ok(Self {
            storage_dir,
            log_format,
            currency,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional variable, treating blank as unset.
fn parse_optional<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr<Err = String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e))
        })
        .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ShopConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ShopConfig::default());
        assert_eq!(config.storage_dir, PathBuf::from(".corner-shop"));
    }

    #[test]
    fn test_reads_all_variables() {
        let config = ShopConfig::from_lookup(lookup(&[
            ("SHOP_STORAGE_DIR", "/var/lib/shop"),
            ("SHOP_LOG_FORMAT", "JSON"),
            ("SHOP_CURRENCY", "gbp"),
        ]))
        .unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("/var/lib/shop"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.currency, CurrencyCode::GBP);
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = ShopConfig::from_lookup(lookup(&[
            ("SHOP_STORAGE_DIR", "  "),
            ("SHOP_CURRENCY", ""),
        ]))
        .unwrap();
        assert_eq!(config, ShopConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ShopConfig::from_lookup(lookup(&[("SHOP_LOG_FORMAT", "xml")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "SHOP_LOG_FORMAT"));

        let err = ShopConfig::from_lookup(lookup(&[("SHOP_CURRENCY", "BTC")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "SHOP_CURRENCY"));
    }
}
