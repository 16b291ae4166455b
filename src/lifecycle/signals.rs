//! OS signal handling.
//!
//! # Responsibilities
//! - Register SIGINT and SIGTERM handlers (Ctrl+C on Windows)
//! - Resolve once the first of them arrives
//!
//! Handlers are registered by [`TerminationSignals::install`], not on first
//! poll. A signal delivered between install and the first poll of
//! [`TerminationSignals::recv`] is kept and resolves it immediately.

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

/// Registered termination signal handlers.
pub struct TerminationSignals {
    #[cfg(unix)]
    interrupt: Signal,
    #[cfg(unix)]
    terminate: Signal,
    #[cfg(windows)]
    ctrl_c: tokio::signal::windows::CtrlC,
}

impl TerminationSignals {
    /// Register the handlers now. Must be called inside a Tokio runtime.
    ///
    /// Once registered, the default action of these signals (terminating the
    /// process) is replaced for the rest of the process lifetime.
    pub fn install() -> std::io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            interrupt: signal(SignalKind::interrupt())?,
            #[cfg(unix)]
            terminate: signal(SignalKind::terminate())?,
            #[cfg(windows)]
            ctrl_c: tokio::signal::windows::ctrl_c()?,
        })
    }

    /// Resolve when the first termination signal arrives, logging which one.
    #[cfg(unix)]
    pub async fn recv(mut self) {
        tokio::select! {
            _ = self.interrupt.recv() => {
                tracing::info!(signal = "SIGINT", "Termination signal received");
            }
            _ = self.terminate.recv() => {
                tracing::info!(signal = "SIGTERM", "Termination signal received");
            }
        }
    }

    /// Resolve when the first termination signal arrives, logging which one.
    #[cfg(windows)]
    pub async fn recv(mut self) {
        self.ctrl_c.recv().await;
        tracing::info!(signal = "Ctrl+C", "Termination signal received");
    }
}
