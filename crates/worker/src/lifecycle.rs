//! Install and activate transitions.
//!
//! Install populates the current cache store; activate purges stores left
//! behind by prior versions and takes control of open windows. Version
//! bumps in configuration are the sole cache invalidation mechanism.

use sanctum_core::{Error, Request};

use crate::worker::{ServiceWorker, WorkerState};

impl ServiceWorker {
    /// Install: populate the current store with the precache asset list.
    ///
    /// Population is all-or-nothing; any failed fetch aborts the whole
    /// step. The worker still requests immediate activation afterwards
    /// rather than blocking on a partial cache.
    pub async fn on_install(&self) {
        tracing::info!(version = %self.config.version, "installing");
        self.set_state(WorkerState::Installing);

        if let Err(err) = self.precache().await {
            tracing::error!(%err, "precache failed");
        }

        self.set_state(WorkerState::Installed);
        self.request_skip_waiting();
    }

    async fn precache(&self) -> Result<(), Error> {
        let mut fetched = Vec::with_capacity(self.config.precache_urls.len());
        for path in &self.config.precache_urls {
            let request = Request::get(self.config.page_url(path)?);
            let response = self.fetch_with_budget(&request, self.config.asset_timeout()).await?;
            if !response.is_ok() {
                return Err(Error::FetchFailed(format!("precache of {path} got status {}", response.status)));
            }
            fetched.push((request, response));
        }

        // Only write once every asset fetched cleanly.
        for (request, response) in &fetched {
            self.cache.put(&self.config.version, request, response).await?;
        }

        tracing::info!(assets = fetched.len(), "precached static assets");
        Ok(())
    }

    /// Activate: purge stores from prior versions and claim open windows.
    ///
    /// # Errors
    ///
    /// Propagates cache and window-claim failures; the runtime surfaces
    /// them as a failed activation.
    pub async fn on_activate(&self) -> Result<(), Error> {
        tracing::info!(version = %self.config.version, "activating");
        self.set_state(WorkerState::Activating);

        for name in self.cache.store_names().await? {
            if name != self.config.version {
                let removed = self.cache.delete_store(&name).await?;
                tracing::info!(store = %name, entries = removed, "deleted stale cache store");
            }
        }

        self.windows.claim().await?;
        self.set_state(WorkerState::Activated);
        tracing::info!("claimed clients");
        Ok(())
    }
}
