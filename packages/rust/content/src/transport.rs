//! Transport capability and its reqwest-backed implementation.

use std::future::Future;
use std::time::Duration;

use ftapi_shared::{FtApiError, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::paths::redact;

/// Maximum number of redirects to follow per request.
const MAX_REDIRECTS: usize = 3;

/// Default timeout in seconds for a single request.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("ftapi/", env!("CARGO_PKG_VERSION"));

/// Issues one request for a fully built path and resolves with its body.
pub trait Transport: Send + Sync + 'static {
    fn request(&self, path: &str) -> impl Future<Output = Result<Value>> + Send;
}

// ---------------------------------------------------------------------------
// HTTP transport
// ---------------------------------------------------------------------------

/// Configuration for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Timeout for each request in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// GETs the path and decodes the body as JSON.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(opts: &HttpOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(opts.timeout_secs))
            .build()
            .map_err(|e| FtApiError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn request(&self, path: &str) -> Result<Value> {
        let shown = redact(path);
        debug!(path = %shown, "GET");

        let response = self
            .client
            .get(path)
            .send()
            .await
            .map_err(|e| FtApiError::Transport(format!("{shown}: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FtApiError::Http {
                path: shown,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            FtApiError::Transport(format!("{shown}: failed to read body: {}", e.without_url()))
        })?;

        serde_json::from_str(&body).map_err(|e| FtApiError::Decode {
            path: shown,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetches_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pages/abc"))
            .and(query_param("apiKey", "bar"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"page":{"id":"abc"}}"#),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&HttpOptions::default()).unwrap();
        let body = transport
            .request(&format!("{}/pages/abc?apiKey=bar", server.uri()))
            .await
            .unwrap();

        assert_eq!(body["page"]["id"], "abc");
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&HttpOptions::default()).unwrap();
        let err = transport
            .request(&format!("{}/pages/abc?apiKey=secret", server.uri()))
            .await
            .unwrap_err();

        match err {
            FtApiError::Http { path, status } => {
                assert_eq!(status, 403);
                assert!(!path.contains("secret"));
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&HttpOptions::default()).unwrap();
        let err = transport
            .request(&format!("{}/items/1?apiKey=bar", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, FtApiError::Decode { .. }));
    }

    #[tokio::test]
    async fn malformed_path_is_transport_error() {
        let transport = HttpTransport::new(&HttpOptions::default()).unwrap();
        let err = transport.request("?apiKey=bar").await.unwrap_err();
        assert!(matches!(err, FtApiError::Transport(_)));
    }
}
