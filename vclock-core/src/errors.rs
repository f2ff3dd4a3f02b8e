use std::io;
use std::net::AddrParseError;

use thiserror::Error;

/// Result type used across the core crate.
pub type Result<T> = std::result::Result<T, VClockError>;

/// Process-level error representation shared by the binary and the service.
#[derive(Debug, Error)]
pub enum VClockError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("invalid bind address: {0}")]
    InvalidAddress(#[from] AddrParseError),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("logging setup failed: {0}")]
    LoggingError(String),
}

/// Dedicated configuration error used by the configuration module.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {key}: {value}")]
    InvalidEnvVar { key: String, value: String },
}

impl From<ConfigError> for VClockError {
    fn from(value: ConfigError) -> Self {
        VClockError::ConfigError(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_keeps_its_message() {
        let err: VClockError = ConfigError::InvalidEnvVar {
            key: "VCLOCK_HTTP_BIND".into(),
            value: "nowhere".into(),
        }
        .into();

        assert!(matches!(err, VClockError::ConfigError(_)));
        assert_eq!(
            err.to_string(),
            "configuration error: invalid value for environment variable VCLOCK_HTTP_BIND: nowhere"
        );
    }

    #[test]
    fn address_parse_failure_converts() {
        let parse: Result<std::net::SocketAddr> = "clock:9000".parse().map_err(VClockError::from);
        assert!(matches!(parse, Err(VClockError::InvalidAddress(_))));
    }
}
