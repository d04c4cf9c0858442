//! # Form Configuration
//!
//! Settings for the sale form: which branch the counter belongs to, the
//! product lookup term, the total debounce window, where to navigate after
//! a sale and how to reach the backend.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     COUNTER_BRANCH_ID=1                                                │
//! │     COUNTER_BACKEND_URL=http://10.0.0.5:8080                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/counter-pos/counter.toml (Linux)                         │
//! │     ~/Library/Application Support/com.counter.pos/counter.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Branch 1 "Dhanmondi", 300ms debounce                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # counter.toml
//! [branch]
//! id = 1
//! name = "Dhanmondi"
//!
//! [lookup]
//! category_term = "Pharacetamol"
//!
//! [pricing]
//! debounce_ms = 300
//!
//! [navigation]
//! invoice_route = "invoice"
//!
//! [backend]
//! base_url = "http://localhost:8080"
//! timeout_secs = 10
//! ```

use std::path::PathBuf;
use std::time::Duration;

use counter_client::BackendConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{FormError, FormResult};

/// Default quiet period before the total is recomputed.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

// =============================================================================
// Branch Settings
// =============================================================================

/// The branch this counter sells for.
///
/// `id` selects the reference product list, `name` filters category
/// lookups. Both must describe the same branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchSettings {
    #[serde(default = "default_branch_id")]
    pub id: i64,

    #[serde(default = "default_branch_name")]
    pub name: String,
}

fn default_branch_id() -> i64 {
    1
}

fn default_branch_name() -> String {
    "Dhanmondi".to_string()
}

impl Default for BranchSettings {
    fn default() -> Self {
        BranchSettings {
            id: default_branch_id(),
            name: default_branch_name(),
        }
    }
}

// =============================================================================
// Lookup Settings
// =============================================================================

/// How candidate products are fetched after a category change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupSettings {
    /// Term sent to the by-category product query.
    ///
    /// The deployed backend answers every category change with this fixed
    /// term rather than the chosen category's name.
    #[serde(default = "default_category_term")]
    pub category_term: String,
}

fn default_category_term() -> String {
    "Pharacetamol".to_string()
}

impl Default for LookupSettings {
    fn default() -> Self {
        LookupSettings {
            category_term: default_category_term(),
        }
    }
}

// =============================================================================
// Pricing / Navigation Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Quiet period after the last row edit before the total is recomputed
    /// (milliseconds).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            debounce_ms: default_debounce_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationSettings {
    /// Route opened after a sale is recorded.
    #[serde(default = "default_invoice_route")]
    pub invoice_route: String,
}

fn default_invoice_route() -> String {
    "invoice".to_string()
}

impl Default for NavigationSettings {
    fn default() -> Self {
        NavigationSettings {
            invoice_route: default_invoice_route(),
        }
    }
}

// =============================================================================
// Main Form Configuration
// =============================================================================

/// Complete form configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default)]
    pub branch: BranchSettings,

    #[serde(default)]
    pub lookup: LookupSettings,

    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub navigation: NavigationSettings,

    #[serde(default)]
    pub backend: BackendConfig,
}

impl FormConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (counter.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> FormResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading form config from file");
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

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> FormResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| FormError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| FormError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| FormError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Form config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> FormResult<()> {
        if self.branch.name.trim().is_empty() {
            return Err(FormError::InvalidConfig("branch.name must not be empty".into()));
        }

        if self.pricing.debounce_ms == 0 {
            return Err(FormError::InvalidConfig(
                "debounce_ms must be greater than 0".into(),
            ));
        }

        if self.navigation.invoice_route.trim().is_empty() {
            return Err(FormError::InvalidConfig(
                "navigation.invoice_route must not be empty".into(),
            ));
        }

        self.backend.validate()?;

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies `COUNTER_*` overrides read through `var`. Numeric values that
    /// do not parse are ignored with a warning.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(id) = var("COUNTER_BRANCH_ID") {
            match id.parse::<i64>() {
                Ok(parsed) => {
                    debug!(branch_id = parsed, "Overriding branch ID from environment");
                    self.branch.id = parsed;
                }
                Err(_) => warn!(value = %id, "Ignoring non-numeric COUNTER_BRANCH_ID"),
            }
        }

        if let Some(name) = var("COUNTER_BRANCH_NAME") {
            self.branch.name = name;
        }

        if let Some(term) = var("COUNTER_LOOKUP_TERM") {
            self.lookup.category_term = term;
        }

        if let Some(ms) = var("COUNTER_DEBOUNCE_MS") {
            match ms.parse::<u64>() {
                Ok(parsed) => {
                    debug!(debounce_ms = parsed, "Overriding debounce from environment");
                    self.pricing.debounce_ms = parsed;
                }
                Err(_) => warn!(value = %ms, "Ignoring non-numeric COUNTER_DEBOUNCE_MS"),
            }
        }

        if let Some(url) = var("COUNTER_BACKEND_URL") {
            debug!(url = %url, "Overriding backend URL from environment");
            self.backend.base_url = url;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "counter", "pos")
            .map(|dirs| dirs.config_dir().join("counter.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.pricing.debounce_ms)
    }
}
