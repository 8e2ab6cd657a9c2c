use crate::errors::SetupError;
use crate::policies::PolicyType;

use config::{
    builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File, FileFormat,
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub log_level: String,
    pub policy: PolicyType,
}

impl AppConfig {
    /// Reads an optional `exploration.*` file, overridden by `EXPLORATION__*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::build(
            Self::builder()?
                .add_source(File::with_name("exploration").required(false))
                .add_source(Environment::with_prefix("EXPLORATION").separator("__")),
        )
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Self::build(Self::builder()?.add_source(File::from_str(content, FileFormat::Toml)))
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder().set_default("log_level", "info")
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }

    /// Installs a global fmt subscriber, `RUST_LOG` takes precedence over `log_level`.
    pub fn init_tracing(&self) -> Result<(), SetupError> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.log_level))
            .map_err(|err| SetupError::Tracing(err.to_string()))?;

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .map_err(|err| SetupError::Tracing(err.to_string()))
    }
}
