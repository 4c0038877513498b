//! HTTP fetcher backed by reqwest.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;

use crate::config::HttpConfig;
use crate::sources::{FetchError, Fetcher};

/// Default connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Default timeout for each read from the connection
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Shared HTTP fetcher with bounded connect and read timeouts
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Arc<Client>,
}

impl HttpFetcher {
    /// Create a new fetcher with default settings
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeouts(DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT)
    }

    /// Create a new fetcher with custom timeouts
    pub fn with_timeouts(connect: Duration, read: Duration) -> Result<Self, FetchError> {
        Self::build(default_user_agent(), connect, read)
    }

    /// Create a fetcher from the `[http]` configuration section
    pub fn from_config(config: &HttpConfig) -> Result<Self, FetchError> {
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(default_user_agent);
        Self::build(user_agent, config.connect_timeout(), config.read_timeout())
    }

    fn build(user_agent: String, connect: Duration, read: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(connect)
            .read_timeout(read)
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_raw(&self, url: &str) -> Result<String, FetchError> {
        let url = url::Url::parse(url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "unsupported scheme: {}",
                url.scheme()
            )));
        }

        tracing::debug!(%url, "Requesting");

        // The response owns the connection; it is dropped on every return below.
        let response = self.client.get(url).send().await?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_fetch_ok_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/volumes")
            .match_query(mockito::Matcher::UrlEncoded("q".into(), "android".into()))
            .with_status(200)
            .with_header("content-type", "application/json; charset=UTF-8")
            .with_body(r#"{"items": []}"#)
            .create_async()
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let url = format!("{}/volumes?maxResults=20&q=android", server.url());
        let body = fetcher.fetch(Some(&url)).await;

        assert_eq!(body, r#"{"items": []}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_reads_utf8_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .with_status(200)
            .with_body("Caf\u{e9} \u{1f4da}")
            .create_async()
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let body = fetcher.fetch(Some(&format!("{}/", server.url()))).await;
        assert_eq!(body, "Caf\u{e9} \u{1f4da}");
    }

    #[tokio::test]
    async fn test_fetch_non_200_is_empty() {
        let mut server = mockito::Server::new_async().await;
        for (path, status) in [("/missing", 404), ("/error", 500), ("/created", 201)] {
            server
                .mock("GET", path)
                .with_status(status)
                .with_body(r#"{"items": []}"#)
                .create_async()
                .await;
        }

        let fetcher = HttpFetcher::new().unwrap();
        for path in ["/missing", "/error", "/created"] {
            let url = format!("{}{}", server.url(), path);
            assert_eq!(fetcher.fetch(Some(&url)).await, "");
        }

        let err = fetcher
            .fetch_raw(&format!("{}/missing", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status(404)));
    }

    #[tokio::test]
    async fn test_fetch_malformed_url_is_empty() {
        let fetcher = HttpFetcher::new().unwrap();
        assert_eq!(fetcher.fetch(Some("not a url")).await, "");
        assert_eq!(fetcher.fetch(Some("ftp://example.com/file")).await, "");
        assert_eq!(fetcher.fetch(None).await, "");

        let err = fetcher.fetch_raw("::").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_empty() {
        // Bind then drop to get a local port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = HttpFetcher::new().unwrap();
        assert_eq!(fetcher.fetch(Some(&format!("http://{}/", addr))).await, "");
    }

    #[tokio::test]
    async fn test_fetch_stalled_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Accept the connection, read the request, never answer.
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        });

        let fetcher =
            HttpFetcher::with_timeouts(Duration::from_millis(500), Duration::from_millis(300))
                .unwrap();

        let started = std::time::Instant::now();
        let body = fetcher.fetch(Some(&format!("http://{}/", addr))).await;

        assert_eq!(body, "");
        assert!(started.elapsed() < Duration::from_secs(10));
        server.abort();
    }

    #[test]
    fn test_from_config_uses_configured_timeouts() {
        let config = HttpConfig {
            connect_timeout_ms: 1_000,
            read_timeout_ms: 2_000,
            user_agent: Some("test-agent/1.0".to_string()),
        };
        assert!(HttpFetcher::from_config(&config).is_ok());
        assert_eq!(config.connect_timeout(), Duration::from_secs(1));
        assert_eq!(config.read_timeout(), Duration::from_secs(2));
    }
}
