//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Every problem is
//! reported, not just the first one.

use std::net::IpAddr;

use crate::config::schema::ServerConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("host {0:?} is not an IP address")]
    InvalidHost(String),

    #[error("port must be non-zero")]
    ZeroPort,

    #[error("shutdown_timeout_secs must be greater than zero")]
    ZeroShutdownTimeout,

    #[error("request_timeout_secs must be greater than zero when set")]
    ZeroRequestTimeout,

    #[error("tls.cert_path must not be empty")]
    EmptyCertPath,

    #[error("tls.key_path must not be empty")]
    EmptyKeyPath,
}

/// Validate a configuration, returning every error found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.host.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::InvalidHost(config.host.clone()));
    }
    if config.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }
    if config.shutdown_timeout_secs == 0 {
        errors.push(ValidationError::ZeroShutdownTimeout);
    }
    if config.request_timeout_secs == Some(0) {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.tls.cert_path.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyCertPath);
    }
    if config.tls.key_path.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyKeyPath);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
