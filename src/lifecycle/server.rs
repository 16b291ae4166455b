//! The lifecycle controller: one TLS listener, its shutdown, and the
//! completion signal the main task waits on.
//!
//! Three tasks cooperate:
//! - the accept loop (`serve`), which owns the connections and runs the drain,
//! - the signal watcher (`wait_for_exit_signal`), which requests the drain,
//! - the main task (`wait_for_completion`), which must not exit mid-drain.
//!
//! Requesting a shutdown only flips the state to `ShuttingDown`; the accept
//! loop notices, drains within the requested timeout and fires completion
//! after it has exited. Dropping a `shutdown` future therefore never leaves
//! the drain half done.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use tokio::sync::watch;
use tracing::Instrument;

use crate::error::{ServerError, ShutdownError};
use crate::lifecycle::completion::{Completion, ShutdownOutcome};
use crate::lifecycle::state::LifecycleState;

/// A TLS listener with coordinated graceful shutdown.
///
/// Share it behind an `Arc`: one task calls [`serve`](Self::serve), another
/// [`wait_for_exit_signal`](Self::wait_for_exit_signal), and the caller of
/// `serve` finishes with [`wait_for_completion`](Self::wait_for_completion).
/// A server runs once; there is no restart.
pub struct GracefulServer {
    addr: SocketAddr,
    tls: RustlsConfig,
    handle: Handle,
    started: AtomicBool,
    state: watch::Sender<LifecycleState>,
    drain_timeout: OnceLock<Duration>,
    local_addr: OnceLock<SocketAddr>,
    completion: Completion,
    span: tracing::Span,
}

impl GracefulServer {
    /// Create a server for `addr` using the given TLS material.
    pub fn new(addr: SocketAddr, tls: RustlsConfig) -> Self {
        let (state, _) = watch::channel(LifecycleState::Created);
        Self {
            addr,
            tls,
            handle: Handle::new(),
            started: AtomicBool::new(false),
            state,
            drain_timeout: OnceLock::new(),
            local_addr: OnceLock::new(),
            completion: Completion::new(),
            span: tracing::info_span!("server", %addr),
        }
    }

    /// Emit this server's events under `span` instead of the default one.
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    /// Address actually bound, once listening (resolves port 0).
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr.get().copied()
    }

    /// Wait for the bind outcome. `None` if the listener closed without
    /// ever listening.
    pub async fn listening(&self) -> Option<SocketAddr> {
        let mut rx = self.state.subscribe();
        let _ = rx.wait_for(|state| *state != LifecycleState::Created).await;
        self.local_addr()
    }

    /// Number of open client connections.
    pub fn in_flight(&self) -> usize {
        self.handle.connection_count()
    }

    /// Accept TLS connections and dispatch them to `app` until shut down.
    ///
    /// Returns `Ok(())` when the listener closes because of a shutdown.
    /// Bind failures and listener I/O failures are returned as errors.
    /// Handshake and per-connection errors stay inside their connection.
    pub async fn serve(&self, app: Router) -> Result<(), ServerError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(ServerError::AlreadyStarted);
        }
        self.run(app).instrument(self.span.clone()).await
    }

    async fn run(&self, app: Router) -> Result<(), ServerError> {
        let server = axum_server::bind_rustls(self.addr, self.tls.clone())
            .handle(self.handle.clone())
            .serve(app.into_make_service_with_connect_info::<SocketAddr>());
        tokio::pin!(server);

        let bound = tokio::select! {
            result = &mut server => {
                self.transition(LifecycleState::Closed);
                return result.map_err(|source| ServerError::Bind { addr: self.addr, source });
            }
            bound = self.handle.listening() => bound,
        };

        let Some(local_addr) = bound else {
            let result = server.await;
            self.transition(LifecycleState::Closed);
            tracing::error!("Listener failed to bind");
            return result.map_err(|source| ServerError::Bind { addr: self.addr, source });
        };

        let _ = self.local_addr.set(local_addr);
        self.transition(LifecycleState::Listening);
        tracing::info!(address = %local_addr, "Listening for connections");

        let mut state = self.state.subscribe();
        let shutdown_requested = async {
            let _ = state
                .wait_for(|s| *s == LifecycleState::ShuttingDown)
                .await;
        };

        let (result, outcome) = tokio::select! {
            result = &mut server => {
                // A shutdown requested as the listener exited still gets an outcome.
                let outcome = (self.state() == LifecycleState::ShuttingDown)
                    .then(|| drain_outcome(&result, None, Duration::ZERO, Duration::ZERO));
                (result, outcome)
            }
            () = shutdown_requested => {
                let (result, outcome) = self.drain(server.as_mut()).await;
                (result, Some(outcome))
            }
        };

        self.transition(LifecycleState::Closed);
        // Completion must not precede the accept loop's exit.
        if let Some(outcome) = outcome {
            self.completion.fire(outcome);
        }

        match result {
            Ok(()) => {
                tracing::info!("Listener closed");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Listener failed");
                Err(ServerError::Serve(e))
            }
        }
    }

    async fn drain<F>(&self, mut server: Pin<&mut F>) -> (std::io::Result<()>, ShutdownOutcome)
    where
        F: Future<Output = std::io::Result<()>>,
    {
        // Set by the caller that requested the shutdown, before the state flipped.
        let timeout = self.drain_timeout.get().copied().unwrap_or_default();
        let started = Instant::now();
        tracing::info!(
            timeout_secs = timeout.as_secs_f64(),
            in_flight = self.in_flight(),
            "Draining connections"
        );

        self.handle.graceful_shutdown(None);

        let (result, forced) = match tokio::time::timeout(timeout, server.as_mut()).await {
            Ok(result) => (result, None),
            Err(_) => {
                let in_flight = self.in_flight();
                tracing::warn!(in_flight, "Drain timed out, closing remaining connections");
                self.handle.shutdown();
                (server.await, Some(in_flight))
            }
        };

        let outcome = drain_outcome(&result, forced, timeout, started.elapsed());
        (result, outcome)
    }

    /// Wait for the listener to come up, then for `signal`, then shut down
    /// within `timeout`.
    ///
    /// Nothing is requested before the listener is listening. `signal` may
    /// already have been registered (see `TerminationSignals::install`), so a
    /// signal that arrived earlier triggers the shutdown right after the bind.
    pub async fn wait_for_exit_signal<F>(
        &self,
        signal: F,
        timeout: Duration,
    ) -> Result<ShutdownOutcome, ShutdownError>
    where
        F: Future<Output = ()>,
    {
        if self.listening().await.is_none() {
            tracing::debug!(parent: &self.span, "Listener never came up; not watching for signals");
            return Err(ShutdownError::NotListening);
        }

        signal.await;

        let result = self.shutdown(timeout).await;
        match &result {
            Ok(ShutdownOutcome::Drained { elapsed }) => {
                tracing::info!(parent: &self.span, elapsed_ms = elapsed.as_millis() as u64, "Shutdown processed successfully");
            }
            Ok(ShutdownOutcome::TimedOut { in_flight, .. }) => {
                tracing::warn!(parent: &self.span, in_flight, "Shutdown timed out; connections were closed forcibly");
            }
            Ok(ShutdownOutcome::Failed { .. }) => {
                tracing::error!(parent: &self.span, "Listener failed while shutting down");
            }
            Err(e) => {
                tracing::warn!(parent: &self.span, error = %e, "Shutting down");
            }
        }
        result
    }

    /// Ask the accept loop to stop accepting, drain in-flight requests for up
    /// to `timeout`, force-close whatever is left and publish the outcome.
    ///
    /// Only the first request's timeout is used; every caller gets the same
    /// outcome. Dropping the returned future does not cancel the drain.
    /// Fails if the listener is not (or never was) listening.
    pub async fn shutdown(&self, timeout: Duration) -> Result<ShutdownOutcome, ShutdownError> {
        let mut previous = LifecycleState::Created;
        self.state.send_if_modified(|state| {
            previous = *state;
            if *state == LifecycleState::Listening {
                let _ = self.drain_timeout.set(timeout);
                *state = LifecycleState::ShuttingDown;
                true
            } else {
                false
            }
        });

        match previous {
            LifecycleState::Listening => {
                tracing::info!(parent: &self.span, timeout_secs = timeout.as_secs_f64(), "Shutdown requested");
                Ok(self.completion.wait().await)
            }
            LifecycleState::ShuttingDown => Ok(self.completion.wait().await),
            LifecycleState::Closed => self.completion.outcome().ok_or(ShutdownError::NotListening),
            LifecycleState::Created => Err(ShutdownError::NotListening),
        }
    }

    /// Block until the shutdown sequence has concluded.
    pub async fn wait_for_completion(&self) -> ShutdownOutcome {
        tracing::info!(parent: &self.span, "Waiting for shutdown to finish");
        let outcome = self.completion.wait().await;
        tracing::info!(parent: &self.span, drained = outcome.is_drained(), "Shutdown finished");
        outcome
    }

    fn transition(&self, next: LifecycleState) {
        self.state.send_if_modified(|state| {
            if state.can_transition_to(next) {
                tracing::debug!(from = %state, to = %next, "Lifecycle transition");
                *state = next;
                true
            } else {
                false
            }
        });
    }
}

/// Classify a finished drain. A listener error wins over a timeout.
fn drain_outcome(
    result: &std::io::Result<()>,
    forced: Option<usize>,
    timeout: Duration,
    elapsed: Duration,
) -> ShutdownOutcome {
    match (result, forced) {
        (Err(_), _) => ShutdownOutcome::Failed { elapsed },
        (Ok(()), Some(in_flight)) => ShutdownOutcome::TimedOut { timeout, in_flight },
        (Ok(()), None) => ShutdownOutcome::Drained { elapsed },
    }
}
