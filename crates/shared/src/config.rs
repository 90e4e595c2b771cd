//! Engine configuration.
//!
//! The engine only ever needs two knobs: where to find the database, and
//! which sign convention `credit`/`debit` should apply (§9 of the design
//! notes — carried explicitly through this struct rather than as hidden
//! global state).

use serde::Deserialize;

/// Top-level engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// `false` (default): debits positive, credits negative.
    /// `true`: debits negative, credits positive.
    #[serde(default)]
    pub debits_are_negative: bool,
}

/// Database connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

impl EngineConfig {
    /// Loads configuration from config files and environment overrides.
    ///
    /// Layering: `config/default.{toml,...}`, then `config/{RUN_MODE}.*`,
    /// then `LEDGERKEEP__*` environment variables, highest priority last.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or deserialized.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LEDGERKEEP").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
