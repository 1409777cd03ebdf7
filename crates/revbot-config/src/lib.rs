//! Config module.

mod drivers;

use std::{
    env,
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};

pub use drivers::{DatabaseDriver, DriverError};

/// Hard cap on reviewer seats per pull request.
pub const MAX_REVIEWER_SLOTS: usize = 2;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database driver.
    pub driver: DatabaseDriver,
    /// Postgres options.
    pub pg: DatabasePgConfig,
    /// Maximum time spent waiting on a pull request row lock (in milliseconds)
    pub lock_timeout_ms: u64,
}

#[derive(Debug, Clone)]
pub struct DatabasePgConfig {
    /// Database URL.
    pub url: String,
    /// Database pool size.
    pub pool_size: u32,
    /// Database connection timeout (in seconds)
    pub connection_timeout: u32,
}

#[derive(Debug, Clone)]
pub struct ReviewersConfig {
    /// Seats created on each new pull request.
    pub max_count: usize,
    /// Minimum seats required to accept a new pull request.
    pub min_count: usize,
}

#[derive(Debug, Clone)]
pub struct SentryConfig {
    /// Sentry URL.
    pub url: String,
    /// Traces sample rate (between 0 and 1) for Sentry
    pub traces_sample_rate: f32,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Use bunyan logging.
    pub use_bunyan: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind IP.
    pub bind_ip: String,
    /// Server bind port.
    pub bind_port: u16,
    /// Server workers count.
    pub workers_count: Option<u16>,
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Service name.
    pub name: String,
    /// Database options.
    pub database: DatabaseConfig,
    /// Reviewer assignment options.
    pub reviewers: ReviewersConfig,
    /// Logging options.
    pub logging: LoggingConfig,
    /// Sentry options.
    pub sentry: SentryConfig,
    /// Server options.
    pub server: ServerConfig,
    /// Random seed
    pub random_seed: u64,
    /// App version
    pub version: String,
}

impl Config {
    /// Create configuration from environment.
    pub fn from_env(version: String) -> Result<Config, DriverError> {
        Ok(Config {
            name: env_to_str("BOT_NAME", "revbot"),
            database: DatabaseConfig {
                driver: DatabaseDriver::from_str(&env_to_str("BOT_DATABASE_DRIVER", "pg"))?,
                pg: DatabasePgConfig {
                    url: env_to_str("BOT_DATABASE_PG_URL", &env_to_str("DATABASE_URL", "")),
                    pool_size: env_to_u32("BOT_DATABASE_PG_POOL_SIZE", 20),
                    connection_timeout: env_to_u32("BOT_DATABASE_PG_CONNECTION_TIMEOUT", 5),
                },
                lock_timeout_ms: env_to_u64("BOT_DATABASE_LOCK_TIMEOUT_MS", 5000),
            },
            reviewers: ReviewersConfig {
                max_count: env_to_usize("BOT_MAX_REVIEWERS", MAX_REVIEWER_SLOTS)
                    .min(MAX_REVIEWER_SLOTS),
                min_count: env_to_usize("BOT_MIN_REVIEWERS", 0).min(MAX_REVIEWER_SLOTS),
            },
            logging: LoggingConfig {
                use_bunyan: env_to_bool("BOT_LOGGING_USE_BUNYAN", false),
            },
            sentry: SentryConfig {
                url: env_to_str("BOT_SENTRY_URL", ""),
                traces_sample_rate: env_to_f32("BOT_SENTRY_TRACES_SAMPLE_RATE", 0.0),
            },
            server: ServerConfig {
                bind_ip: env_to_str("BOT_SERVER_BIND_IP", "127.0.0.1"),
                bind_port: env_to_u16("BOT_SERVER_BIND_PORT", env_to_u16("PORT", 8080)),
                workers_count: env_to_optional_u16("BOT_SERVER_WORKERS_COUNT", None),
            },
            random_seed: env_to_u64("BOT_RANDOM_SEED", random_seed()),
            version,
        })
    }

    pub fn from_env_no_version() -> Result<Config, DriverError> {
        Self::from_env("0.0.0".into())
    }
}

fn random_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

fn env_to_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .map(|e| e.parse().unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_optional_u16(name: &str, default: Option<u16>) -> Option<u16> {
    env::var(name)
        .map(|e| e.parse::<u16>().map(Some).unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .map(|e| e.parse().unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .map(|e| e.parse().unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .map(|e| e.parse().unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_f32(name: &str, default: f32) -> f32 {
    env::var(name)
        .map(|e| e.parse().unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_bool(name: &str, default: bool) -> bool {
    env::var(name).map(|e| !e.is_empty()).unwrap_or(default)
}

fn env_to_str(name: &str, default: &str) -> String {
    env::var(name)
        .unwrap_or_else(|_e| default.to_string())
        .replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_helpers_fall_back_on_garbage() {
        env::set_var("REVBOT_TEST_GARBAGE_U64", "not-a-number");
        assert_eq!(env_to_u64("REVBOT_TEST_GARBAGE_U64", 12), 12);
        assert_eq!(env_to_usize("REVBOT_TEST_MISSING", 3), 3);
        assert_eq!(env_to_optional_u16("REVBOT_TEST_MISSING", None), None);

        env::set_var("REVBOT_TEST_MULTILINE", "a\\nb");
        assert_eq!(env_to_str("REVBOT_TEST_MULTILINE", ""), "a\nb");
    }

    #[test]
    fn reviewer_counts_are_capped() {
        let config = Config::from_env_no_version().unwrap();
        assert!(config.reviewers.max_count <= MAX_REVIEWER_SLOTS);
        assert!(config.reviewers.min_count <= MAX_REVIEWER_SLOTS);
    }
}
