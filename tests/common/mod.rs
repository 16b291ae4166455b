//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use graceful_tls::net::load_tls_config;
use graceful_tls::{GracefulServer, ServerError};
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// A self-signed key pair written to a temporary directory.
pub struct TestCerts {
    _dir: TempDir,
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Generate a self-signed certificate for localhost/127.0.0.1.
pub fn self_signed() -> TestCerts {
    let certified = rcgen::generate_simple_self_signed(vec![
        "localhost".to_string(),
        "127.0.0.1".to_string(),
    ])
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let cert = dir.path().join("server.crt");
    let key = dir.path().join("server.key");
    std::fs::write(&cert, certified.cert.pem()).unwrap();
    std::fs::write(&key, certified.key_pair.serialize_pem()).unwrap();

    TestCerts {
        _dir: dir,
        cert,
        key,
    }
}

/// HTTPS client that trusts the self-signed test certificate.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// A server running on an ephemeral loopback port.
pub struct Running {
    pub server: Arc<GracefulServer>,
    pub addr: SocketAddr,
    pub task: JoinHandle<Result<(), ServerError>>,
    _certs: TestCerts,
}

impl Running {
    pub fn url(&self, path: &str) -> String {
        format!("https://{}{}", self.addr, path)
    }
}

/// Create a server on 127.0.0.1:0 without starting it.
pub async fn server() -> (Arc<GracefulServer>, TestCerts) {
    let certs = self_signed();
    let tls = load_tls_config(&certs.cert, &certs.key).await.unwrap();
    let server = GracefulServer::new("127.0.0.1:0".parse().unwrap(), tls);
    (Arc::new(server), certs)
}

/// Start `app` and wait until it is listening.
pub async fn start(app: Router) -> Running {
    let (server, certs) = server().await;
    let task = {
        let server = server.clone();
        tokio::spawn(async move { server.serve(app).await })
    };
    let addr = tokio::time::timeout(Duration::from_secs(5), server.listening())
        .await
        .expect("server did not start listening")
        .expect("server failed to bind");

    Running {
        server,
        addr,
        task,
        _certs: certs,
    }
}

/// Router whose only route sleeps for `delay` before answering.
pub fn slow_router(delay: Duration) -> Router {
    Router::new().route(
        "/",
        get(move || async move {
            tokio::time::sleep(delay).await;
            "slow response"
        }),
    )
}

/// Poll until the server reports at least `count` open connections.
pub async fn wait_for_in_flight(server: &GracefulServer, count: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while server.in_flight() < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("connection never arrived");
}
