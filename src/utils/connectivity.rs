//! Network reachability checks made before a search is started.

use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;

/// Answers whether the network is usable.
#[async_trait]
pub trait Connectivity: Send + Sync + std::fmt::Debug {
    /// Whether a request has a chance of reaching the search endpoint
    async fn is_connected(&self) -> bool;
}

/// A fixed answer, for tests and offline use
#[derive(Debug, Clone, Copy)]
pub struct StaticConnectivity(pub bool);

#[async_trait]
impl Connectivity for StaticConnectivity {
    async fn is_connected(&self) -> bool {
        self.0
    }
}

/// Probes the endpoint host with a bounded TCP connect
#[derive(Debug, Clone)]
pub struct TcpConnectivity {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpConnectivity {
    /// Probe `host:port`, giving up after `timeout`
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Probe the host and port of `url`.
    ///
    /// Returns `None` if the URL has no host.
    pub fn for_url(url: &str, timeout: Duration) -> Option<Self> {
        let parsed = url::Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_string();
        let port = parsed.port_or_known_default()?;
        Some(Self::new(host, port, timeout))
    }

    /// Host being probed
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port being probed
    pub fn port(&self) -> u16 {
        self.port
    }
}

#[async_trait]
impl Connectivity for TcpConnectivity {
    async fn is_connected(&self) -> bool {
        let addr = (self.host.as_str(), self.port);
        match tokio::time::timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(e)) => {
                tracing::debug!(host = %self.host, port = self.port, error = %e, "Connectivity probe failed");
                false
            }
            Err(_) => {
                tracing::debug!(host = %self.host, port = self.port, "Connectivity probe timed out");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[test]
    fn test_for_url_uses_default_port() {
        let probe = TcpConnectivity::for_url(
            "https://www.googleapis.com/books/v1/volumes",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(probe.host(), "www.googleapis.com");
        assert_eq!(probe.port(), 443);

        let probe = TcpConnectivity::for_url("http://127.0.0.1:8080/v", Duration::from_secs(1))
            .unwrap();
        assert_eq!(probe.port(), 8080);
    }

    #[test]
    fn test_for_url_rejects_invalid() {
        assert!(TcpConnectivity::for_url("not a url", Duration::from_secs(1)).is_none());
    }

    #[test]
    fn test_static_connectivity() {
        assert!(tokio_test::block_on(StaticConnectivity(true).is_connected()));
        assert!(!tokio_test::block_on(StaticConnectivity(false).is_connected()));
    }

    #[tokio::test]
    async fn test_tcp_probe_listening_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let probe = TcpConnectivity::new("127.0.0.1", port, Duration::from_secs(2));
        assert!(probe.is_connected().await);
    }

    #[tokio::test]
    async fn test_tcp_probe_closed_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let probe = TcpConnectivity::new("127.0.0.1", port, Duration::from_secs(2));
        assert!(!probe.is_connected().await);
    }
}
