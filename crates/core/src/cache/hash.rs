//! Request identity hashing for cache entry keys.

use sha2::{Digest, Sha256};

/// Compute the entry key for a request identity (method + URL).
///
/// Stable across processes so a store written by one worker instance can be
/// replayed by its successor.
pub fn entry_key(method: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_stability() {
        let key1 = entry_key("GET", "http://localhost:3000/api/menu");
        let key2 = entry_key("GET", "http://localhost:3000/api/menu");
        assert_eq!(key1, key2);
    }

    #[test]
    fn test_key_differs_by_method() {
        let get = entry_key("GET", "http://localhost:3000/api/orders");
        let post = entry_key("POST", "http://localhost:3000/api/orders");
        assert_ne!(get, post);
    }

    #[test]
    fn test_key_format() {
        let key = entry_key("GET", "http://localhost:3000/");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
