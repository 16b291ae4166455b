//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! lifecycle, http
//!     → tracing events with structured fields, inside per-component spans
//!     → logging.rs (subscriber: env filter + pretty/JSON formatter)
//!     → stdout
//! ```

pub mod logging;
