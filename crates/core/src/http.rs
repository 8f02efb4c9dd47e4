//! Request and response value types crossed at the interception boundary.
//!
//! The worker never sees live socket types; the host hands it a [`Request`]
//! per intercepted fetch and expects a [`Response`] back, produced from the
//! network or replayed from the cache.

use bytes::Bytes;
use url::Url;

use crate::Error;

/// HTTP method of an intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
        }
    }

    pub fn is_get(&self) -> bool {
        matches!(self, Method::Get)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a request was initiated.
///
/// Navigations are top-level page loads; everything else (scripts, styles,
/// API calls) is a sub-resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMode {
    Navigate,
    #[default]
    SubResource,
}

/// An intercepted outgoing request.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub mode: RequestMode,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl Request {
    /// A plain sub-resource GET.
    pub fn get(url: Url) -> Self {
        Self { method: Method::Get, url, mode: RequestMode::SubResource, headers: Vec::new(), body: None }
    }

    /// A top-level navigation GET.
    pub fn navigate(url: Url) -> Self {
        Self { mode: RequestMode::Navigate, ..Self::get(url) }
    }

    /// A POST carrying a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `Error::Decode` if the body fails to serialize.
    pub fn post_json<T: serde::Serialize>(url: Url, body: &T) -> Result<Self, Error> {
        let body = serde_json::to_vec(body)?;
        Ok(Self {
            method: Method::Post,
            url,
            mode: RequestMode::SubResource,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Some(Bytes::from(body)),
        })
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }
}

/// A response, either live from the network or replayed from the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl Response {
    /// An empty 200 with the given content type, mostly useful in tests.
    pub fn ok(content_type: &str, body: impl Into<Bytes>) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
            body: body.into(),
        }
    }

    /// Whether this response is cacheable-successful (status 200).
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Case-insensitive header lookup, first match wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Synthesized 503 returned when a request cannot be served offline.
    ///
    /// Body shape is fixed: `{"error":"Offline","message":<message>}` with
    /// `Content-Type: application/json`.
    pub fn offline_json(message: &str) -> Self {
        let body = serde_json::json!({ "error": "Offline", "message": message }).to_string();
        Self {
            status: 503,
            status_text: "Service Unavailable".to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Bytes::from(body),
        }
    }
}
