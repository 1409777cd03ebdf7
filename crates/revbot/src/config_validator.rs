//! Validation utilities.

use std::fmt::Write;

use revbot_config::{Config, DatabaseDriver};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Errors on environment variables:\n{}", errors)]
    EnvVarsError { errors: String },
}

fn validate_env_vars(config: &Config) -> Result<(), ValidationError> {
    #[inline]
    fn _missing(error: &mut String, name: &str) {
        let _ = write!(error, "\n  - Missing env. var.: {}", name);
    }

    #[inline]
    fn _invalid(error: &mut String, name: &str, reason: &str) {
        let _ = write!(error, "\n  - Invalid env. var.: {} ({})", name, reason);
    }

    let mut error = String::new();

    // Check server configuration
    if config.server.bind_ip.is_empty() {
        _missing(&mut error, "BOT_SERVER_BIND_IP");
    }
    if config.server.bind_port == 0 {
        _missing(&mut error, "BOT_SERVER_BIND_PORT");
    }
    if config.name.is_empty() {
        _missing(&mut error, "BOT_NAME");
    }

    // Check PG configuration
    if config.database.driver == DatabaseDriver::Postgres && config.database.pg.url.is_empty() {
        _missing(&mut error, "BOT_DATABASE_PG_URL");
    }
    if config.database.lock_timeout_ms == 0 {
        _invalid(&mut error, "BOT_DATABASE_LOCK_TIMEOUT_MS", "must be positive");
    }

    // Check reviewer policy
    if config.reviewers.min_count > config.reviewers.max_count {
        _invalid(
            &mut error,
            "BOT_MIN_REVIEWERS",
            "must not exceed BOT_MAX_REVIEWERS",
        );
    }

    if !(0.0..=1.0).contains(&config.sentry.traces_sample_rate) {
        _invalid(
            &mut error,
            "BOT_SENTRY_TRACES_SAMPLE_RATE",
            "must be between 0 and 1",
        );
    }

    if error.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::EnvVarsError { errors: error })
    }
}

/// Validate configuration.
pub fn validate_configuration(config: &Config) -> Result<(), ValidationError> {
    validate_env_vars(config)
}
