//! Error taxonomy.
//!
//! Only configuration, TLS and bind failures cross into `main`; everything
//! that happens per connection or during the drain is logged where it occurs.

use std::path::PathBuf;

use crate::config::ValidationError;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Which half of the key pair a TLS error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PemKind {
    Certificate,
    PrivateKey,
}

impl std::fmt::Display for PemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PemKind::Certificate => write!(f, "certificate"),
            PemKind::PrivateKey => write!(f, "private key"),
        }
    }
}

/// Errors raised while loading the TLS key pair.
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("{kind} file not found: {path:?}")]
    NotFound { kind: PemKind, path: PathBuf },

    #[error("failed to read {kind} file {path:?}: {source}")]
    Read {
        kind: PemKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no PEM certificate found in {path:?}")]
    NoCertificates { path: PathBuf },

    #[error("no PEM private key found in {path:?}")]
    NoPrivateKey { path: PathBuf },

    #[error("invalid certificate/key pair: {source}")]
    Invalid {
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced by the accept loop.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("listener was already started")]
    AlreadyStarted,

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("listener failed: {0}")]
    Serve(#[source] std::io::Error),
}

/// Errors from initiating a shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ShutdownError {
    #[error("shutdown requested before the listener was listening")]
    NotListening,
}

/// Fatal startup errors reported by the binary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("failed to install signal handlers: {0}")]
    Signal(#[source] std::io::Error),
}
