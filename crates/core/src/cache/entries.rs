//! Cache entry reads and writes.
//!
//! Entries are keyed by request identity within a named store. Writes are
//! idempotent replacements of the same key, so concurrent fetch handlers
//! racing on the same entry resolve last-write-wins without locking.

use super::connection::CacheDb;
use super::hash::entry_key;
use crate::http::{Request, Response};
use crate::Error;
use bytes::Bytes;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

impl CacheDb {
    /// Insert or replace the cached response for a request.
    pub async fn put(&self, store: &str, request: &Request, response: &Response) -> Result<(), Error> {
        let store = store.to_string();
        let key = entry_key(request.method.as_str(), request.url.as_str());
        let method = request.method.as_str().to_string();
        let url = request.url.to_string();
        let status = response.status as i64;
        let status_text = response.status_text.clone();
        let headers_json = serde_json::to_string(&response.headers)?;
        let body = response.body.to_vec();
        let stored_at = chrono::Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO responses (
                        store, entry_key, method, url, status, status_text,
                        headers_json, body, stored_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    ON CONFLICT(store, entry_key) DO UPDATE SET
                        method = excluded.method,
                        url = excluded.url,
                        status = excluded.status,
                        status_text = excluded.status_text,
                        headers_json = excluded.headers_json,
                        body = excluded.body,
                        stored_at = excluded.stored_at",
                    params![store, key, method, url, status, status_text, headers_json, body, stored_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Look up the cached response for a request identity.
    ///
    /// Returns None when the store holds no entry for it.
    pub async fn match_request(&self, store: &str, request: &Request) -> Result<Option<Response>, Error> {
        self.lookup(store, entry_key(request.method.as_str(), request.url.as_str()))
            .await
    }

    /// Look up the cached GET response stored under a URL.
    ///
    /// Used for entries addressed by location rather than by a live request:
    /// the offline fallback document and the pending-order sentinel.
    pub async fn match_get(&self, store: &str, url: &str) -> Result<Option<Response>, Error> {
        self.lookup(store, entry_key("GET", url)).await
    }

    async fn lookup(&self, store: &str, key: String) -> Result<Option<Response>, Error> {
        let store = store.to_string();
        self.conn
            .call(move |conn| -> Result<Option<Response>, Error> {
                let result = conn.query_row(
                    "SELECT status, status_text, headers_json, body
                     FROM responses WHERE store = ?1 AND entry_key = ?2",
                    params![store, key],
                    |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, Vec<u8>>(3)?,
                        ))
                    },
                );

                match result {
                    Ok((status, status_text, headers_json, body)) => {
                        let headers: Vec<(String, String)> = serde_json::from_str(&headers_json)?;
                        Ok(Some(Response {
                            status: status as u16,
                            status_text,
                            headers,
                            body: Bytes::from(body),
                        }))
                    }
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Delete the GET entry stored under a URL.
    ///
    /// Returns true when an entry was removed.
    pub async fn delete_get(&self, store: &str, url: &str) -> Result<bool, Error> {
        let store = store.to_string();
        let key = entry_key("GET", url);
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let removed = conn.execute(
                    "DELETE FROM responses WHERE store = ?1 AND entry_key = ?2",
                    params![store, key],
                )?;
                Ok(removed > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Names of every store present, current or stale.
    pub async fn store_names(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT DISTINCT store FROM responses ORDER BY store")?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every entry belonging to a named store.
    ///
    /// Returns the number of entries removed.
    pub async fn delete_store(&self, name: &str) -> Result<u64, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let removed = conn.execute("DELETE FROM responses WHERE store = ?1", params![name])?;
                Ok(removed as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    const STORE: &str = "sanctum-cafe-v1.0.0";

    fn make_request(path: &str) -> Request {
        Request::get(Url::parse("http://localhost:3000").unwrap().join(path).unwrap())
    }

    #[tokio::test]
    async fn test_put_and_match() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let request = make_request("/api/menu");
        let response = Response::ok("application/json", r#"{"items":[]}"#);

        db.put(STORE, &request, &response).await.unwrap();

        let cached = db.match_request(STORE, &request).await.unwrap().unwrap();
        assert_eq!(cached, response);
    }

    #[tokio::test]
    async fn test_match_miss() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let cached = db.match_request(STORE, &make_request("/nope")).await.unwrap();
        assert!(cached.is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_same_identity() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let request = make_request("/api/settings");

        db.put(STORE, &request, &Response::ok("application/json", "{\"v\":1}"))
            .await
            .unwrap();
        db.put(STORE, &request, &Response::ok("application/json", "{\"v\":2}"))
            .await
            .unwrap();

        let cached = db.match_request(STORE, &request).await.unwrap().unwrap();
        assert_eq!(&cached.body[..], b"{\"v\":2}");
    }

    #[tokio::test]
    async fn test_match_get_by_url() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let request = make_request("/offline.html");
        db.put(STORE, &request, &Response::ok("text/html", "<h1>Offline</h1>"))
            .await
            .unwrap();

        let cached = db
            .match_get(STORE, "http://localhost:3000/offline.html")
            .await
            .unwrap();
        assert!(cached.is_some());
    }

    #[tokio::test]
    async fn test_delete_store_leaves_others() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let request = make_request("/");
        let response = Response::ok("text/html", "<html></html>");
        db.put("sanctum-cafe-v0.9.0", &request, &response).await.unwrap();
        db.put(STORE, &request, &response).await.unwrap();

        let removed = db.delete_store("sanctum-cafe-v0.9.0").await.unwrap();
        assert_eq!(removed, 1);

        assert_eq!(db.store_names().await.unwrap(), vec![STORE.to_string()]);
        assert!(db.match_request(STORE, &request).await.unwrap().is_some());
    }
}
