//! Figment layering of defaults, discovered files and the environment

use crate::discovery::{ConfigFile, ConfigFormat, FileDiscovery};
use crate::error::ConfigResult;
use crate::FlexformConfig;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use tracing::{debug, trace};

/// Prefix of environment variables that override configuration.
///
/// Nested keys are separated by a double underscore, so
/// `FLEXFORM_AUTOCOMPLETE__TIMEOUT_MS` sets `autocomplete.timeout_ms`.
pub const ENV_PREFIX: &str = "FLEXFORM_";

/// Builds a [`FlexformConfig`] from every source in precedence order
#[derive(Debug, Default, Clone)]
pub struct ConfigProvider {
    discovery: FileDiscovery,
}

impl ConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_discovery(discovery: FileDiscovery) -> Self {
        Self { discovery }
    }

    /// Load and check the configuration
    pub fn load(&self) -> ConfigResult<FlexformConfig> {
        let config: FlexformConfig = self.build_figment().extract()?;
        config.validate()?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Defaults, then global files, then project files, then the environment
    pub fn build_figment(&self) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(FlexformConfig::default()))
            .merge(self.discovered_files())
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn discovered_files(&self) -> Figment {
        self.discovery
            .discover_all()
            .iter()
            .fold(Figment::new(), |figment, file| {
                figment.merge(Self::file_provider(file))
            })
    }

    fn file_provider(file: &ConfigFile) -> Figment {
        trace!("Loading config file: {}", file.path.display());
        match file.format {
            ConfigFormat::Toml => Figment::from(Toml::file(&file.path)),
            ConfigFormat::Yaml => Figment::from(Yaml::file(&file.path)),
            ConfigFormat::Json => Figment::from(Json::file(&file.path)),
        }
    }
}
