//! Flexform configuration loaded with figment
//!
//! Sources are merged in this order, later ones winning:
//!
//! 1. built-in defaults
//! 2. `~/.flexform/config.{toml,yaml,yml,json}`
//! 3. `./.flexform/config.{toml,yaml,yml,json}`
//! 4. `FLEXFORM_` environment variables, nested keys split on `__`
//!
//! ```toml
//! [expression]
//! max_length = 2048
//! max_nesting = 16
//!
//! [autocomplete]
//! timeout_ms = 5000
//! default_per_page = 25
//! ```

pub mod discovery;
pub mod error;
pub mod provider;

pub use discovery::{ConfigFile, ConfigFormat, ConfigScope, FileDiscovery};
pub use error::{ConfigError, ConfigResult};
pub use provider::{ConfigProvider, ENV_PREFIX};

use flexform_autocomplete::AutocompleteSettings;
use flexform_expr::ExpressionLimits;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything a Flexform process can be configured with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlexformConfig {
    pub expression: ExpressionLimits,
    pub autocomplete: AutocompleteSettings,
}

impl FlexformConfig {
    /// Load from the home directory, the working directory and the environment
    pub fn load() -> ConfigResult<Self> {
        ConfigProvider::new().load()
    }

    /// Load with explicit project and global configuration directories
    pub fn load_from(project_dir: Option<PathBuf>, global_dir: Option<PathBuf>) -> ConfigResult<Self> {
        ConfigProvider::with_discovery(FileDiscovery::with_directories(project_dir, global_dir)).load()
    }

    /// Reject values that parse but cannot work
    pub fn validate(&self) -> ConfigResult<()> {
        let positive = [
            ("expression.max_length", self.expression.max_length as u64),
            ("expression.max_nesting", self.expression.max_nesting as u64),
            ("autocomplete.timeout_ms", self.autocomplete.timeout_ms),
            ("autocomplete.default_per_page", self.autocomplete.default_per_page as u64),
            ("autocomplete.max_per_page", self.autocomplete.max_per_page as u64),
        ];
        if let Some((key, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::invalid_value(*key, "must be at least 1"));
        }
        if self.autocomplete.default_per_page > self.autocomplete.max_per_page {
            return Err(ConfigError::invalid_value(
                "autocomplete.default_per_page",
                format!(
                    "{} exceeds autocomplete.max_per_page ({})",
                    self.autocomplete.default_per_page, self.autocomplete.max_per_page
                ),
            ));
        }
        Ok(())
    }
}
