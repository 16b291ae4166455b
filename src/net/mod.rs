//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! PEM files on disk
//!     → tls.rs (read, check each file, build rustls server config)
//!     → lifecycle::server (TLS handshake per accepted connection)
//! ```
//!
//! # Design Decisions
//! - Key pair is loaded once, before the listener binds
//! - Any load failure is fatal and names the offending file

pub mod tls;

pub use tls::load_tls_config;
