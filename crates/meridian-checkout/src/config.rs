//! # Checkout Configuration
//!
//! Configuration for the protocol client and the store context.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MERIDIAN_API_URL=https://pos.example.com/api                       │
//! │     MERIDIAN_WAREHOUSE_ID=wh-downtown                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/meridian-pos/register.toml (Linux)                       │
//! │     ~/Library/Application Support/com.meridian.pos/register.toml (mac) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     localhost API, 30s request timeout                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # register.toml
//! [api]
//! base_url = "https://pos.example.com/api"
//! bearer_token = "..."          # optional; auth is an external concern
//! connect_timeout_secs = 10
//! request_timeout_secs = 30
//!
//! [store]
//! warehouse_id = "wh-downtown"
//! name = "Downtown Branch"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{CheckoutError, CheckoutResult};

// =============================================================================
// API Settings
// =============================================================================

/// Settings for reaching the platform backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the platform API (http or https).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional bearer token attached as `Authorization`. Auth/session
    /// handling itself is an external collaborator.
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// TCP connect timeout (seconds).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Whole-request timeout (seconds). A hung checkout request resolves to
    /// a Timeout error instead of leaving the register in Submitting
    /// forever.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            bearer_token: None,
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

// =============================================================================
// Store Settings
// =============================================================================

/// The store/warehouse context every checkout request carries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Warehouse identifier, required by the checkout endpoint. May be empty
    /// until setup; the state machine refuses to submit without it.
    #[serde(default)]
    pub warehouse_id: String,

    /// Human-readable store name (receipts, diagnostics).
    #[serde(default)]
    pub name: String,
}

// =============================================================================
// Main Checkout Configuration
// =============================================================================

/// Complete checkout client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Backend API settings.
    #[serde(default)]
    pub api: ApiSettings,

    /// Store context.
    #[serde(default)]
    pub store: StoreSettings,
}

impl CheckoutConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (register.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CheckoutResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading checkout config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load checkout config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> CheckoutResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CheckoutError::ConfigSaveFailed("No config path available".into()))?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Checkout config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CheckoutResult<()> {
        let url = Url::parse(&self.api.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(CheckoutError::InvalidUrl(format!(
                "API URL must be http or https, got: {}",
                self.api.base_url
            )));
        }

        if self.api.request_timeout_secs == 0 {
            return Err(CheckoutError::InvalidConfig(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("MERIDIAN_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Ok(token) = std::env::var("MERIDIAN_API_TOKEN") {
            self.api.bearer_token = Some(token);
        }

        if let Ok(id) = std::env::var("MERIDIAN_WAREHOUSE_ID") {
            debug!(warehouse_id = %id, "Overriding warehouse from environment");
            self.store.warehouse_id = id;
        }

        if let Ok(name) = std::env::var("MERIDIAN_STORE_NAME") {
            self.store.name = name;
        }

        if let Ok(secs) = std::env::var("MERIDIAN_REQUEST_TIMEOUT_SECS") {
            if let Ok(parsed) = secs.parse::<u64>() {
                self.api.request_timeout_secs = parsed;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "meridian", "pos")
            .map(|dirs| dirs.config_dir().join("register.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the warehouse id.
    pub fn warehouse_id(&self) -> &str {
        &self.store.warehouse_id
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &str {
        &self.api.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CheckoutConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert!(config.store.warehouse_id.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = CheckoutConfig::default();
        assert!(config.validate().is_ok());

        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "https://pos.example.com/api".to_string();
        assert!(config.validate().is_ok());

        config.api.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = CheckoutConfig::default();
        config.store.warehouse_id = "wh-01".to_string();
        config.store.name = "Downtown Branch".to_string();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[store]"));

        let parsed: CheckoutConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.store.warehouse_id, "wh-01");
        assert_eq!(parsed.api.base_url, config.api.base_url);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: CheckoutConfig = toml::from_str("[store]\nwarehouse_id = \"wh-02\"\n").unwrap();
        assert_eq!(parsed.store.warehouse_id, "wh-02");
        assert_eq!(parsed.api.request_timeout_secs, 30);
    }
}
