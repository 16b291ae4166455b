//! TLS-terminating HTTP server with coordinated graceful shutdown.
//!
//! ```text
//!   main ──serve()──────────▶ GracefulServer ◀──wait_for_exit_signal()── signal watcher
//!     │                        │  accept loop (axum-server + rustls)        │
//!     │                        ▼                                            │ SIGINT/SIGTERM
//!     │                      http::router → http::handler                   ▼
//!     └──wait_for_completion()◀──────── Completion ◀──────── bounded drain
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::ServerConfig;
pub use error::{Error, ServerError, ShutdownError, TlsError};
pub use lifecycle::{GracefulServer, LifecycleState, ShutdownOutcome};
