//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to legacy variable names with warning logs, and the process-wide
//! `DirectoryConfig` read once at startup.

use std::str::FromStr;
use std::time::Duration;

use crate::common::error::DirectoryError;

/// Default poll interval in minutes.
pub const DEFAULT_CHECK_INTERVAL_MINUTES: u64 = 30;

/// Default SQLite database URL.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:db.sqlite";

/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Get an environment variable with fallback to a legacy name
///
/// If the new variable name is set, returns its value.
/// If only the legacy variable name is set, returns its value
/// and logs a deprecation warning.
///
/// # Example
/// ```
/// use lwdwatch::config::get_env_with_fallback;
///
/// let interval = get_env_with_fallback("LWDWATCH_CHECK_INTERVAL", "CHECK_INTERVAL");
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Unlike a silent default, a value that is set but does not parse is a
/// configuration error.
pub fn parse_env_with_fallback<T>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> Result<T, DirectoryError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get_env_with_fallback(new_name, old_name) {
        Some(raw) => raw.trim().parse().map_err(|e| {
            DirectoryError::Config(format!("invalid value '{}' for {}: {}", raw, new_name, e))
        }),
        None => Ok(default),
    }
}

/// Interpret a boolean flag value (`1/true/yes/on`).
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Verbose flag from `LWDWATCH_DEBUG` (legacy `DEBUG`).
///
/// Read on its own so logging can be initialised before the rest of the
/// configuration is parsed.
pub fn debug_from_env() -> bool {
    get_env_with_fallback("LWDWATCH_DEBUG", "DEBUG")
        .map(|v| parse_flag(&v))
        .unwrap_or(false)
}

/// Poll interval from a minute count; zero is rejected.
pub fn check_interval_from_minutes(minutes: u64) -> Result<Duration, DirectoryError> {
    if minutes == 0 {
        return Err(DirectoryError::Config(
            "check interval must be at least one minute".to_string(),
        ));
    }
    minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .ok_or_else(|| DirectoryError::Config(format!("check interval too large: {}", minutes)))
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryConfig {
    /// Poll Scheduler cadence.
    pub check_interval: Duration,
    /// Bind host.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// SQLite database URL.
    pub database_url: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(DEFAULT_CHECK_INTERVAL_MINUTES * 60),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

impl DirectoryConfig {
    /// Load configuration from environment variables.
    ///
    /// | setting | variable (legacy) | default |
    /// |---|---|---|
    /// | poll interval (minutes) | `LWDWATCH_CHECK_INTERVAL` (`CHECK_INTERVAL`) | 30 |
    /// | bind host | `LWDWATCH_HOST` | `0.0.0.0` |
    /// | listen port | `LWDWATCH_PORT` (`PORT`) | 8080 |
    /// | database URL | `LWDWATCH_DATABASE_URL` (`DATABASE_URL`) | `sqlite:db.sqlite` |
    ///
    /// Verbosity is not part of this struct: it is read by [`debug_from_env`]
    /// before logging starts.
    pub fn from_env() -> Result<Self, DirectoryError> {
        let minutes = parse_env_with_fallback(
            "LWDWATCH_CHECK_INTERVAL",
            "CHECK_INTERVAL",
            DEFAULT_CHECK_INTERVAL_MINUTES,
        )?;
        let host = get_env_with_fallback_or("LWDWATCH_HOST", "LWDWATCH_HOST", DEFAULT_HOST);
        let port = parse_env_with_fallback("LWDWATCH_PORT", "PORT", DEFAULT_PORT)?;
        let database_url =
            get_env_with_fallback_or("LWDWATCH_DATABASE_URL", "DATABASE_URL", DEFAULT_DATABASE_URL);

        Ok(Self {
            check_interval: check_interval_from_minutes(minutes)?,
            host,
            port,
            database_url,
        })
    }

    /// `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
