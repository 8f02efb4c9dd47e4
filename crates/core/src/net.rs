//! Boundary traits between the worker and its hosting environment.

use async_trait::async_trait;

use crate::http::{Request, Response};
use crate::Error;

/// Outbound network access.
///
/// The worker never talks to the network directly; the host supplies an
/// implementation (reqwest-backed in production, mocks in tests).
#[async_trait]
pub trait Network: Send + Sync {
    /// Perform the request against the live network.
    ///
    /// # Errors
    ///
    /// Returns `Error::FetchFailed` when the request could not complete
    /// (connection loss, DNS failure). Non-2xx responses are not errors.
    async fn fetch(&self, request: &Request) -> Result<Response, Error>;
}

/// Reported connectivity state of the environment.
///
/// The router distinguishes "offline" from "online but the backend failed";
/// only the former takes the cache fallback path.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}
