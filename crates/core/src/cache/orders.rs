//! Pending offline order batch storage.
//!
//! The foreground application writes a JSON array of order submissions
//! under a sentinel key when a submission fails due to connectivity. The
//! sync routine drains the batch and clears the key; nothing else in the
//! cache is anything but a full request/response pair.

use super::connection::CacheDb;
use crate::http::{Request, Response};
use crate::Error;
use url::Url;

impl CacheDb {
    /// Read the pending order batch, if any.
    ///
    /// # Errors
    ///
    /// Returns `Error::Decode` when the stored body is not a JSON array.
    pub async fn pending_orders(&self, store: &str, sentinel_url: &str) -> Result<Option<Vec<serde_json::Value>>, Error> {
        match self.match_get(store, sentinel_url).await? {
            Some(response) => Ok(Some(serde_json::from_slice(&response.body)?)),
            None => Ok(None),
        }
    }

    /// Store a batch of orders under the sentinel key, replacing any
    /// existing batch.
    pub async fn store_pending_orders(
        &self,
        store: &str,
        sentinel_url: &str,
        orders: &[serde_json::Value],
    ) -> Result<(), Error> {
        let url = Url::parse(sentinel_url).map_err(|e| Error::InvalidUrl(format!("{sentinel_url}: {e}")))?;
        let request = Request::get(url);
        let response = Response::ok("application/json", serde_json::to_vec(orders)?);
        self.put(store, &request, &response).await
    }

    /// Remove the batch. Returns true when one was present.
    pub async fn clear_pending_orders(&self, store: &str, sentinel_url: &str) -> Result<bool, Error> {
        self.delete_get(store, sentinel_url).await
    }
}
