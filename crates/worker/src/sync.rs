//! Deferred sync of orders submitted while offline.
//!
//! The foreground app queues failed submissions under a sentinel cache key;
//! once connectivity returns, the host fires a tagged sync event and the
//! batch is replayed against the orders endpoint.

use sanctum_core::{Error, Request};

use crate::worker::ServiceWorker;

impl ServiceWorker {
    /// Handle a sync event. Only the configured order-sync tag is known.
    pub async fn on_sync(&self, tag: &str) {
        tracing::info!(tag, "sync triggered");
        if tag != self.config.sync_tag {
            return;
        }

        if let Err(err) = self.sync_pending_orders().await {
            tracing::error!(%err, "order sync failed");
        }
    }

    /// Drain the pending offline order batch.
    ///
    /// Every order in the batch is attempted; an individual failure is
    /// logged and does not stop the drain. The batch is cleared afterwards
    /// regardless, so a failed submission is not retried (at-most-once).
    pub async fn sync_pending_orders(&self) -> Result<(), Error> {
        let sentinel = self.config.page_url(&self.config.pending_orders_key)?;
        let Some(orders) = self
            .cache
            .pending_orders(&self.config.version, sentinel.as_str())
            .await?
        else {
            return Ok(());
        };

        tracing::info!(count = orders.len(), "replaying queued orders");
        let endpoint = self.config.page_url(&self.config.orders_endpoint)?;
        for order in &orders {
            let request = Request::post_json(endpoint.clone(), order)?;
            if let Err(err) = self.network.fetch(&request).await {
                tracing::error!(%err, "failed to sync order");
            }
        }

        self.cache
            .clear_pending_orders(&self.config.version, sentinel.as_str())
            .await?;
        Ok(())
    }
}
