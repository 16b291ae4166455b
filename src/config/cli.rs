//! Command-line flags.
//!
//! Priority, lowest first: built-in defaults, the optional TOML file, flags.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::read_config;
use crate::config::schema::{LogFormat, ServerConfig};
use crate::config::validation::validate_config;
use crate::error::ConfigError;

/// TLS-terminating HTTP server with graceful shutdown
#[derive(Parser, Debug, Default)]
#[command(name = "graceful-tls", version, about)]
pub struct Args {
    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Port to listen on [default: 3100]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Seconds to wait before shutting down [default: 10]
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Interface to bind [default: 0.0.0.0]
    #[arg(long)]
    pub host: Option<String>,

    /// PEM certificate file [default: ./certs/server.crt]
    #[arg(long)]
    pub cert: Option<PathBuf>,

    /// PEM private key file [default: ./certs/server.key]
    #[arg(long)]
    pub key: Option<PathBuf>,

    /// Per-request timeout in seconds (unbounded when absent)
    #[arg(long)]
    pub request_timeout: Option<u64>,

    /// Log filter (e.g., "graceful_tls=debug,tower_http=info")
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

impl Args {
    /// Resolve the effective configuration and validate it.
    pub fn into_config(self) -> Result<ServerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => ServerConfig::default(),
        };

        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(timeout) = self.timeout {
            config.shutdown_timeout_secs = timeout;
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(cert) = self.cert {
            config.tls.cert_path = cert;
        }
        if let Some(key) = self.key {
            config.tls.key_path = key;
        }
        if self.request_timeout.is_some() {
            config.request_timeout_secs = self.request_timeout;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }

        // CLI > env > file/default
        if let Some(filter) = self.log_level.or_else(|| std::env::var("RUST_LOG").ok()) {
            config.logging.filter = filter;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn no_flags_gives_defaults() {
        let args = Args::try_parse_from(["graceful-tls"]).unwrap();
        let config = args.into_config().unwrap();
        assert_eq!(config.port, 3100);
        assert_eq!(config.shutdown_timeout_secs, 10);
    }

    #[test]
    fn flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 4000\nshutdown_timeout_secs = 7").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let args = Args::try_parse_from([
            "graceful-tls",
            "--config",
            &path,
            "--port",
            "4443",
            "--request-timeout",
            "2",
            "--log-format",
            "json",
        ])
        .unwrap();
        let config = args.into_config().unwrap();

        assert_eq!(config.port, 4443);
        assert_eq!(config.shutdown_timeout_secs, 7);
        assert_eq!(config.request_timeout_secs, Some(2));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn zero_timeout_flag_is_rejected() {
        let args = Args::try_parse_from(["graceful-tls", "--timeout", "0"]).unwrap();
        assert!(matches!(
            args.into_config(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn non_numeric_port_fails_parsing() {
        assert!(Args::try_parse_from(["graceful-tls", "--port", "https"]).is_err());
    }
}
