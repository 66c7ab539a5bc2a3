//! Configuration for the sirbot runtime.
//!
//! Settings are loaded with figment from defaults, `sirbot.toml` (or YAML with
//! the `yaml-config` feature), `SIRBOT_*` environment variables and
//! programmatic overrides, then validated.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    BotConfig, DatabaseConfig, LogFormat, LogLevel, LogOutput, LoggingConfig, MEMORY_DATABASE_URL,
    SirbotConfig, SlackConfig, SpanEventConfig,
};
pub use validation::validate_config;
