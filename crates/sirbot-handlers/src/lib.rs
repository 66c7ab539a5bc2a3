//! # Sirbot Handlers
//!
//! The command set of the pyslackers bot, expressed as registrations for the
//! sirbot dispatcher.
//!
//! | Name          | Trigger                                            | Mode     |
//! |---------------|----------------------------------------------------|----------|
//! | `greet`       | mention, `hello`                                   | awaited  |
//! | `tell`        | mention, admin, `^tell`                            | awaited  |
//! | `acknowledge` | mention                                            | awaited  |
//! | `archive`     | every standard message                             | detached |
//! | `topic_audit` | `channel_topic` subtype                            | awaited  |
//! | `repo_link`   | `g#`                                               | awaited  |
//! | `inspect`     | admin channel, mention, admin, `^inspect`          | awaited  |
//! | `help`        | `^help`                                            | awaited  |
//!
//! Patterns other than `g#` are case-insensitive.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use sirbot_core::BotIdentity;
use sirbot_framework::{HandlerRegistry, RegistryError, RegistryResult};

pub mod acknowledge;
pub mod archive;
pub mod greet;
pub mod help;
pub mod inspect;
pub mod repo_link;
pub mod tell;
pub mod topic;

#[cfg(test)]
pub(crate) mod mock;

/// Tunables of the command set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandSettings {
    /// Reaction added to messages mentioning the bot.
    pub reaction: String,
    /// Owner assumed by `g#repo` when none is given.
    pub default_repo_owner: String,
    /// Base URL of the code host used by `g#`.
    pub repo_host: String,
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            reaction: "sirbot".to_string(),
            default_repo_owner: "pyslackers".to_string(),
            repo_host: "https://github.com".to_string(),
        }
    }
}

impl CommandSettings {
    /// Builds the repository URL for a `g#` reference.
    pub fn repo_url(&self, reference: &str) -> String {
        let host = self.repo_host.trim_end_matches('/');
        if reference.contains('/') {
            format!("{host}/{reference}")
        } else {
            format!("{host}/{}/{reference}", self.default_repo_owner)
        }
    }
}

/// Builds the registry of every command, in dispatch order.
pub fn registrations(
    settings: &CommandSettings,
    identity: &BotIdentity,
) -> RegistryResult<HandlerRegistry> {
    Ok(HandlerRegistry::builder()
        .register(greet::registration()?)
        .register(tell::registration()?)
        .register(acknowledge::registration(&settings.reaction))
        .register(archive::registration())
        .register(topic::registration())
        .register(repo_link::registration(settings)?)
        .register(inspect::registration(identity.admin_channel())?)
        .register(help::registration()?)
        .build())
}

/// Compiles a case-insensitive command pattern.
pub(crate) fn compile(expr: &str) -> RegistryResult<Regex> {
    build(expr, true)
}

/// Compiles a case-sensitive pattern, for platform ids.
pub(crate) fn compile_exact(expr: &str) -> RegistryResult<Regex> {
    build(expr, false)
}

fn build(expr: &str, case_insensitive: bool) -> RegistryResult<Regex> {
    RegexBuilder::new(expr)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|source| RegistryError::InvalidPattern {
            pattern: expr.to_string(),
            source,
        })
}
