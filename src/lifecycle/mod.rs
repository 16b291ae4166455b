//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (server.rs):
//!     Bind TLS listener → Listening → accept loop
//!
//! Shutdown (server.rs):
//!     Signal received → Stop accepting → Drain (bounded) → Closed → Completion
//!
//! Signals (signals.rs):
//!     Install handlers before serving → SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Signal handlers are registered before the listener binds; the watcher
//!   only acts on a signal once the listener is listening
//! - The accept loop runs the drain, so a cancelled `shutdown` caller cannot
//!   strand it
//! - Shutdown has a timeout: remaining connections are force-closed after it
//! - Completion fires once, with the outcome, on both drain paths

pub mod completion;
pub mod server;
pub mod signals;
pub mod state;

pub use completion::{Completion, ShutdownOutcome};
pub use server::GracefulServer;
pub use signals::TerminationSignals;
pub use state::LifecycleState;
