//! Configuration validation.

use crate::config::Config;
use crate::error::{Error, Result};

/// Validate a merged configuration before any network client is built.
pub fn validate_config(config: &Config) -> Result<()> {
    for (field, value) in [
        ("reddit.client_id", &config.reddit.client_id),
        ("reddit.client_secret", &config.reddit.client_secret),
        ("reddit.username", &config.reddit.username),
        ("reddit.password", &config.reddit.password),
    ] {
        if value.trim().is_empty() {
            return Err(Error::MissingConfig(field.to_string()));
        }
    }

    if config.reddit.user_agent.trim().is_empty() {
        return Err(Error::ConfigValidation {
            field: "reddit.user_agent".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    if config.options.poll_interval_seconds == 0 {
        return Err(Error::ConfigValidation {
            field: "options.poll_interval_seconds".to_string(),
            message: "must be at least 1 second".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RedditConfig;

    fn valid_config() -> Config {
        Config {
            reddit: RedditConfig {
                client_id: "id".to_string(),
                client_secret: "secret".to_string(),
                username: "user".to_string(),
                password: "pass".to_string(),
                user_agent: "agent/1.0".to_string(),
            },
            options: Default::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let mut config = valid_config();
        config.reddit.client_secret = String::new();

        match validate_config(&config) {
            Err(Error::MissingConfig(field)) => assert_eq!(field, "reddit.client_secret"),
            other => panic!("expected MissingConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_whitespace_credentials_rejected() {
        let mut config = valid_config();
        config.reddit.username = "   ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let mut config = valid_config();
        config.options.poll_interval_seconds = 0;

        match validate_config(&config) {
            Err(Error::ConfigValidation { field, .. }) => {
                assert_eq!(field, "options.poll_interval_seconds");
            }
            other => panic!("expected ConfigValidation, got {:?}", other),
        }
    }
}
