//! Request classification and caching strategies.
//!
//! Every intercepted request takes exactly one branch, in precedence order:
//!
//! 1. Navigations: network-first with write-through, falling back to the
//!    cache and then the offline document.
//! 2. API requests: auth-sensitive paths pass straight through untouched;
//!    the rest are network-first with an offline 503 fallback, and
//!    mutations are never replayed from cache.
//! 3. Everything else (static assets): cache-first.
//!
//! Cache writes are best-effort throughout: a store failure never fails
//! the response handed back to the requester.

use std::time::Duration;

use sanctum_core::{Error, Request, Response};

use crate::worker::ServiceWorker;

/// Synthesized body for offline GET API misses.
const OFFLINE_GET_MESSAGE: &str = "This feature is not available offline";
/// Synthesized body for offline mutations.
const OFFLINE_MUTATION_MESSAGE: &str = "Cannot perform this action while offline";

impl ServiceWorker {
    /// Route one intercepted request to its strategy.
    pub async fn handle_fetch(&self, request: Request) -> Result<Response, Error> {
        if request.is_navigation() {
            return self.navigation_strategy(request).await;
        }
        if self.config.is_api_path(request.path()) {
            return self.api_strategy(request).await;
        }
        self.asset_strategy(request).await
    }

    /// Network-first: fresh content when reachable, graceful degradation
    /// when not.
    async fn navigation_strategy(&self, request: Request) -> Result<Response, Error> {
        match self.fetch_with_budget(&request, self.config.navigation_timeout()).await {
            Ok(response) => {
                self.cache_put_best_effort(&request, &response).await;
                Ok(response)
            }
            Err(err) => {
                tracing::debug!(url = %request.url, %err, "navigation fetch failed, trying cache");
                if let Some(cached) = self.cache.match_request(&self.config.version, &request).await? {
                    return Ok(cached);
                }
                let offline = self.config.page_url(&self.config.offline_url)?;
                self.cache
                    .match_get(&self.config.version, offline.as_str())
                    .await?
                    .ok_or_else(|| Error::CacheMiss(format!("no offline fallback for {}", request.url)))
            }
        }
    }

    async fn api_strategy(&self, request: Request) -> Result<Response, Error> {
        // Sessions must always be validated live: a cached auth response
        // could validate stale credentials or fail a legitimate login.
        if self.config.is_auth_path(request.path()) {
            return self.fetch_with_budget(&request, self.config.api_timeout()).await;
        }

        match self.fetch_with_budget(&request, self.config.api_timeout()).await {
            Ok(response) => {
                self.cache_put_best_effort(&request, &response).await;
                Ok(response)
            }
            Err(err) => {
                tracing::warn!(path = request.path(), %err, "API request failed");

                if self.connectivity.is_online() {
                    // Backend error, not connectivity loss: the app gets
                    // to see it.
                    return Err(err);
                }
                if !request.method.is_get() {
                    return Ok(Response::offline_json(OFFLINE_MUTATION_MESSAGE));
                }
                match self.cache.match_request(&self.config.version, &request).await? {
                    Some(cached) => Ok(cached),
                    None => Ok(Response::offline_json(OFFLINE_GET_MESSAGE)),
                }
            }
        }
    }

    /// Cache-first: favors speed and offline availability over freshness.
    async fn asset_strategy(&self, request: Request) -> Result<Response, Error> {
        if let Some(cached) = self.cache.match_request(&self.config.version, &request).await? {
            return Ok(cached);
        }

        let response = self.fetch_with_budget(&request, self.config.asset_timeout()).await?;
        self.cache_put_best_effort(&request, &response).await;
        Ok(response)
    }

    /// Fetch with the strategy's timeout budget applied.
    pub(crate) async fn fetch_with_budget(&self, request: &Request, budget: Duration) -> Result<Response, Error> {
        match tokio::time::timeout(budget, self.network.fetch(request)).await {
            Ok(result) => result,
            Err(_) => Err(Error::FetchTimeout(format!("{} exceeded {}ms", request.url, budget.as_millis()))),
        }
    }

    /// Persist a GET 200 response into the current store.
    async fn cache_put_best_effort(&self, request: &Request, response: &Response) {
        if !request.method.is_get() || !response.is_ok() {
            return;
        }
        if let Err(err) = self.cache.put(&self.config.version, request, response).await {
            tracing::warn!(url = %request.url, %err, "cache write failed");
        }
    }
}
