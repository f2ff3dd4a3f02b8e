use std::env;
use std::net::SocketAddr;

use crate::errors::ConfigError;

const DEFAULT_HTTP_BIND: &str = "0.0.0.0:9000";

/// Runtime environment used by the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    fn from_str(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Development,
        }
    }

    /// Log filter used when neither `RUST_LOG` nor `*_LOG_LEVEL` is set.
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Environment::Development => "debug",
            Environment::Staging | Environment::Production => "info",
        }
    }
}

/// Configuration of the clock service process.
#[derive(Debug, Clone)]
pub struct ClockConfig {
    pub http_bind: String,
    pub log_level: Option<String>,
    pub environment: Environment,
}

impl ClockConfig {
    /// Loads configuration from `VCLOCK_*` variables, honouring a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env_with_prefix("VCLOCK_")
    }

    /// Loads configuration from env vars prefixed with the provided value (e.g. `VCLOCK_`).
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        let key = |suffix: &str| format!("{}{}", prefix, suffix);

        let bind_key = key("HTTP_BIND");
        let http_bind = env::var(&bind_key)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HTTP_BIND.to_string());
        if http_bind.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::InvalidEnvVar {
                key: bind_key,
                value: http_bind,
            });
        }

        let log_level = env::var(key("LOG_LEVEL"))
            .ok()
            .filter(|value| !value.trim().is_empty());

        let environment = env::var(key("ENV"))
            .map(|raw| Environment::from_str(&raw))
            .unwrap_or_default();

        Ok(Self {
            http_bind,
            log_level,
            environment,
        })
    }

    /// Address the HTTP listener binds to.
    pub fn bind_address(&self) -> &str {
        &self.http_bind
    }

    /// Effective log filter for [`crate::logging::init_tracing`].
    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or_else(|| self.environment.default_log_level())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_defaults_when_unset() {
        let cfg = ClockConfig::from_env_with_prefix("VCLOCK_TEST_UNSET_").expect("config should load");
        assert_eq!(cfg.bind_address(), "0.0.0.0:9000");
        assert_eq!(cfg.environment, Environment::Development);
        assert_eq!(cfg.log_level(), "debug");
    }

    #[test]
    fn reads_prefixed_variables() {
        env::set_var("VCLOCK_TEST_SET_HTTP_BIND", "127.0.0.1:9100");
        env::set_var("VCLOCK_TEST_SET_ENV", "prod");
        env::set_var("VCLOCK_TEST_SET_LOG_LEVEL", "warn");

        let cfg = ClockConfig::from_env_with_prefix("VCLOCK_TEST_SET_").expect("config should load");
        assert_eq!(cfg.bind_address(), "127.0.0.1:9100");
        assert_eq!(cfg.environment, Environment::Production);
        assert_eq!(cfg.log_level(), "warn");
    }

    #[test]
    fn rejects_invalid_bind_address() {
        env::set_var("VCLOCK_TEST_BAD_HTTP_BIND", "not-an-address");

        let err = ClockConfig::from_env_with_prefix("VCLOCK_TEST_BAD_").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { .. }));
    }
}
