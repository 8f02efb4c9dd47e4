//! reqwest-backed network boundary.
//!
//! ### Client configuration
//! - rustls TLS, gzip/brotli/deflate decoding
//! - Client-level timeout as a backstop behind the router's per-strategy budgets
//! - Max redirects: 5

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use sanctum_core::{Connectivity, Error, Method, Network, Request, Response};

/// Configuration for the HTTP backend.
#[derive(Debug, Clone)]
pub struct NetConfig {
    /// User agent string (default: "sanctum-sw/0.1")
    pub user_agent: String,

    /// Client-level request timeout (default: 30s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            user_agent: "sanctum-sw/0.1".to_string(),
            timeout: Duration::from_millis(30_000),
            max_redirects: 5,
        }
    }
}

/// HTTP implementation of the worker's network boundary.
pub struct HttpNetwork {
    http: Client,
}

impl HttpNetwork {
    /// Create a new network backend with the given configuration.
    pub fn new(config: NetConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::FetchFailed(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Head => reqwest::Method::HEAD,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
            Method::Options => reqwest::Method::OPTIONS,
        };

        let mut builder = self.http.request(method, request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::FetchTimeout(e.to_string())
            } else {
                Error::FetchFailed(format!("network error: {}", e))
            }
        })?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.to_string(), v.to_string())))
            .collect();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::FetchFailed(format!("failed to read response: {}", e)))?;

        tracing::debug!(url = %request.url, status = status.as_u16(), bytes = bytes.len(), "fetched");

        Ok(Response {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            headers,
            body: bytes,
        })
    }
}

/// Shared connectivity flag, toggled by the host as the environment's
/// online state changes.
#[derive(Clone, Debug)]
pub struct OnlineStatus {
    online: Arc<AtomicBool>,
}

impl OnlineStatus {
    pub fn new(online: bool) -> Self {
        Self { online: Arc::new(AtomicBool::new(online)) }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Relaxed);
    }
}

impl Default for OnlineStatus {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity for OnlineStatus {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }
}
