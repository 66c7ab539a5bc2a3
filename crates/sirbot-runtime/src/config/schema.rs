//! Configuration schema definitions.
//!
//! ```toml
//! [bot]
//! user_id = "U0BOT"
//! admins = ["U0ADMIN"]
//! admin_channel = "G0ADMIN"
//!
//! [slack]
//! token = "xoxb-..."
//!
//! [database]
//! url = "postgres://sirbot@localhost/sirbot"
//!
//! [commands]
//! reaction = "sirbot"
//!
//! [logging]
//! level = "debug"
//! filters = { sqlx = "warn" }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use sirbot_core::{AdminSet, BotIdentity};
use sirbot_handlers::CommandSettings;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SirbotConfig {
    /// Who the bot is and who administers it.
    #[serde(default)]
    pub bot: BotConfig,

    /// Slack Web API access.
    #[serde(default)]
    pub slack: SlackConfig,

    /// Message archive and metadata cache.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Command tunables.
    #[serde(default)]
    pub commands: CommandSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

// =============================================================================
// Bot
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotConfig {
    /// The bot's own user id.
    #[serde(default)]
    pub user_id: String,

    /// Users allowed to run admin-only commands.
    #[serde(default)]
    pub admins: Vec<String>,

    /// Channel receiving topic-change notices, and the only channel where
    /// `inspect` is accepted.
    #[serde(default)]
    pub admin_channel: String,
}

impl BotConfig {
    pub fn identity(&self) -> BotIdentity {
        BotIdentity::new(
            self.user_id.clone(),
            AdminSet::new(self.admins.iter().cloned()),
            self.admin_channel.clone(),
        )
    }
}

// =============================================================================
// Slack
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Base URL of the Web API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bot token sent as a bearer token.
    #[serde(default)]
    pub token: String,

    /// Request timeout in seconds, also used by the link checker.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl SlackConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_url() -> String {
    "https://slack.com/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

// =============================================================================
// Database
// =============================================================================

/// URL selecting the in-process store.
pub const MEMORY_DATABASE_URL: &str = "memory://";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `postgres://…` or `memory://`. Without a URL, archival is disabled.
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature.
    Json,
}

/// Where log lines go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEventConfig {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub enter: bool,
    #[serde(default)]
    pub exit: bool,
    #[serde(default)]
    pub close: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub output: LogOutput,

    /// Log file, used with `output = "file"`.
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    #[serde(default = "default_max_files")]
    pub max_files: u32,

    #[serde(default)]
    pub thread_ids: bool,

    /// Include file and line of the call site.
    #[serde(default)]
    pub file_location: bool,

    #[serde(default)]
    pub span_events: SpanEventConfig,

    /// Per-module levels, e.g. `sirbot_framework = "debug"`.
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            file_path: None,
            max_file_size: default_max_file_size(),
            max_files: default_max_files(),
            thread_ids: false,
            file_location: false,
            span_events: SpanEventConfig::default(),
            filters: HashMap::new(),
        }
    }
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

fn default_max_files() -> u32 {
    5
}
