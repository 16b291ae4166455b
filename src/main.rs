//! graceful-tls: a TLS-terminating HTTP server with graceful shutdown.
//!
//! Loads configuration and the key pair, registers SIGINT/SIGTERM handlers,
//! starts the listener, watches for those signals in a background task, and
//! only exits once the shutdown sequence has concluded.

use std::sync::Arc;

use clap::Parser;

use graceful_tls::config::Args;
use graceful_tls::http::build_router;
use graceful_tls::lifecycle::{GracefulServer, ShutdownOutcome, TerminationSignals};
use graceful_tls::net::load_tls_config;
use graceful_tls::observability::logging;

#[tokio::main]
async fn main() -> Result<(), graceful_tls::Error> {
    let config = Args::parse().into_config()?;
    logging::init(&config.logging);

    tracing::info!(
        bind_address = %config.bind_address(),
        shutdown_timeout_secs = config.shutdown_timeout_secs,
        request_timeout_secs = ?config.request_timeout_secs,
        cert = ?config.tls.cert_path,
        key = ?config.tls.key_path,
        "Configuration loaded"
    );

    let tls = load_tls_config(&config.tls.cert_path, &config.tls.key_path)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to load TLS key pair"))?;

    // Registered before the bind so a signal sent as soon as the port is
    // reachable is not lost.
    let signals = TerminationSignals::install()
        .map_err(graceful_tls::Error::Signal)
        .inspect_err(|e| tracing::error!(error = %e, "Exited with error"))?;

    let server = Arc::new(GracefulServer::new(config.bind_address(), tls));

    let watcher = server.clone();
    let shutdown_timeout = config.shutdown_timeout();
    tokio::spawn(async move {
        let _ = watcher
            .wait_for_exit_signal(signals.recv(), shutdown_timeout)
            .await;
    });

    server
        .serve(build_router(&config))
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Exited with error"))?;

    match server.wait_for_completion().await {
        ShutdownOutcome::Drained { elapsed } => {
            tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "Main task exited");
        }
        ShutdownOutcome::TimedOut { timeout, in_flight } => {
            tracing::warn!(
                timeout_secs = timeout.as_secs(),
                aborted = in_flight,
                "Main task exited after forced shutdown"
            );
        }
        ShutdownOutcome::Failed { elapsed } => {
            tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                "Main task exited after the listener failed mid-drain"
            );
        }
    }

    Ok(())
}
