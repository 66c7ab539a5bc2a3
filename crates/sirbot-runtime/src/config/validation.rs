//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{
    BotConfig, DatabaseConfig, LogOutput, LoggingConfig, MEMORY_DATABASE_URL, SirbotConfig,
    SlackConfig,
};
use sirbot_handlers::CommandSettings;

/// Validates the entire configuration.
pub fn validate_config(config: &SirbotConfig) -> ConfigResult<()> {
    validate_bot_config(&config.bot)?;
    validate_slack_config(&config.slack)?;
    validate_database_config(&config.database)?;
    validate_commands(&config.commands)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

fn validate_bot_config(bot: &BotConfig) -> ConfigResult<()> {
    if bot.user_id.is_empty() {
        return Err(ConfigError::missing_field("bot.user_id"));
    }
    if bot.admin_channel.is_empty() {
        return Err(ConfigError::missing_field("bot.admin_channel"));
    }
    if bot.admins.iter().any(|id| id.trim().is_empty()) {
        return Err(ConfigError::validation("Admin ids cannot be empty"));
    }
    Ok(())
}

fn validate_slack_config(slack: &SlackConfig) -> ConfigResult<()> {
    validate_url(&slack.api_url, &["http://", "https://"])?;

    if slack.token.is_empty() {
        return Err(ConfigError::missing_field("slack.token"));
    }
    if slack.timeout_secs == 0 {
        return Err(ConfigError::validation("Timeout must be greater than 0"));
    }
    Ok(())
}

fn validate_database_config(database: &DatabaseConfig) -> ConfigResult<()> {
    let Some(url) = &database.url else {
        return Ok(());
    };
    if url != MEMORY_DATABASE_URL {
        validate_url(url, &["postgres://", "postgresql://"])?;
    }
    if database.max_connections == 0 {
        return Err(ConfigError::validation(
            "Max connections must be greater than 0",
        ));
    }
    Ok(())
}

fn validate_commands(commands: &CommandSettings) -> ConfigResult<()> {
    if commands.reaction.is_empty() {
        return Err(ConfigError::missing_field("commands.reaction"));
    }
    if commands.default_repo_owner.is_empty() {
        return Err(ConfigError::missing_field("commands.default_repo_owner"));
    }
    validate_url(&commands.repo_host, &["http://", "https://"])
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }
    Ok(())
}

fn validate_url(url: &str, schemes: &[&str]) -> ConfigResult<()> {
    if url.is_empty() {
        return Err(ConfigError::missing_field("url"));
    }
    if !schemes.iter().any(|s| url.starts_with(s)) {
        return Err(ConfigError::invalid_url(
            url,
            format!("URL must start with one of: {schemes:?}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SirbotConfig {
        let mut config = SirbotConfig::default();
        config.bot.user_id = "UBOT".into();
        config.bot.admin_channel = "GADMIN".into();
        config.slack.token = "xoxb-test".into();
        config
    }

    #[test]
    fn test_validate_minimal_config() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn test_validate_missing_identity() {
        let mut config = valid();
        config.bot.user_id.clear();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingField { field }) if field == "bot.user_id"
        ));

        let mut config = valid();
        config.bot.admin_channel.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_database_scheme() {
        let mut config = valid();
        config.database.url = Some("mysql://localhost/sirbot".into());
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::InvalidUrl { .. })
        ));

        config.database.url = Some("postgres://localhost/sirbot".into());
        assert!(validate_config(&config).is_ok());

        config.database.url = Some(MEMORY_DATABASE_URL.into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_timeout() {
        let mut config = valid();
        config.slack.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_file_output_needs_path() {
        let mut config = valid();
        config.logging.output = LogOutput::File;
        assert!(validate_config(&config).is_err());

        config.logging.file_path = Some("sirbot.log".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_repo_host() {
        let mut config = valid();
        config.commands.repo_host = "github.com".into();
        assert!(validate_config(&config).is_err());
    }
}
