//! TLS configuration and certificate loading.
//!
//! Both files are checked individually before rustls sees them, so a bad
//! path or an empty PEM fails at startup with the offending file named
//! instead of surfacing as a handshake failure later.

use std::io::BufReader;
use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

use crate::error::{PemKind, TlsError};

/// Load TLS configuration from certificate and key files.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, TlsError> {
    install_crypto_provider();

    let cert_pem = read_pem(PemKind::Certificate, cert_path)?;
    let key_pem = read_pem(PemKind::PrivateKey, key_path)?;

    let has_cert = rustls_pemfile::certs(&mut BufReader::new(cert_pem.as_slice()))
        .any(|cert| cert.is_ok());
    if !has_cert {
        return Err(TlsError::NoCertificates {
            path: cert_path.to_path_buf(),
        });
    }

    match rustls_pemfile::private_key(&mut BufReader::new(key_pem.as_slice())) {
        Ok(Some(_)) => {}
        Ok(None) | Err(_) => {
            return Err(TlsError::NoPrivateKey {
                path: key_path.to_path_buf(),
            })
        }
    }

    let config = RustlsConfig::from_pem(cert_pem, key_pem)
        .await
        .map_err(|source| TlsError::Invalid { source })?;

    tracing::debug!(cert = ?cert_path, key = ?key_path, "TLS key pair loaded");
    Ok(config)
}

/// Install aws-lc-rs as the process-wide rustls provider.
///
/// Other crates in the graph may enable a second provider, in which case
/// rustls refuses to pick one on its own. Repeated calls are harmless.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

fn read_pem(kind: PemKind, path: &Path) -> Result<Vec<u8>, TlsError> {
    std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            TlsError::NotFound {
                kind,
                path: path.to_path_buf(),
            }
        } else {
            TlsError::Read {
                kind,
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_pair(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
        let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        let cert_path = dir.join("server.crt");
        let key_path = dir.join("server.key");
        std::fs::write(&cert_path, certified.cert.pem()).unwrap();
        std::fs::write(&key_path, certified.key_pair.serialize_pem()).unwrap();
        (cert_path, key_path)
    }

    #[tokio::test]
    async fn loads_valid_pair() {
        let dir = tempfile::tempdir().unwrap();
        let (cert, key) = write_pair(dir.path());
        assert!(load_tls_config(&cert, &key).await.is_ok());
    }

    #[tokio::test]
    async fn missing_certificate_is_named() {
        let dir = tempfile::tempdir().unwrap();
        let (_, key) = write_pair(dir.path());
        let missing = dir.path().join("nope.crt");

        let err = load_tls_config(&missing, &key).await.unwrap_err();
        assert!(matches!(
            &err,
            TlsError::NotFound { kind: PemKind::Certificate, path } if path == &missing
        ));
        assert!(err.to_string().contains("nope.crt"));
    }

    #[tokio::test]
    async fn missing_key_is_named() {
        let dir = tempfile::tempdir().unwrap();
        let (cert, _) = write_pair(dir.path());
        let missing = dir.path().join("nope.key");

        let err = load_tls_config(&cert, &missing).await.unwrap_err();
        assert!(matches!(err, TlsError::NotFound { kind: PemKind::PrivateKey, .. }));
    }

    #[tokio::test]
    async fn garbage_certificate_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (cert, key) = write_pair(dir.path());
        std::fs::write(&cert, "not a certificate").unwrap();

        assert!(matches!(
            load_tls_config(&cert, &key).await,
            Err(TlsError::NoCertificates { .. })
        ));
    }

    #[tokio::test]
    async fn swapped_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (cert, key) = write_pair(dir.path());

        assert!(load_tls_config(&key, &cert).await.is_err());
    }
}
