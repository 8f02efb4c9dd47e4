//! Worker configuration with layered loading.
//!
//! Everything the worker treats as fixed — version tag, precache list,
//! route paths, timeout budgets — lives in one immutable struct injected at
//! startup, loaded from multiple sources:
//!
//! 1. Environment variables (SANCTUM_SW_*)
//! 2. TOML config file (if SANCTUM_SW_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::Error;

mod validation;

pub use validation::ConfigError;

/// Worker configuration.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SANCTUM_SW_*)
/// 2. TOML config file (if SANCTUM_SW_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Version tag naming the current cache store.
    ///
    /// Bumping it is the sole cache invalidation mechanism: stores with any
    /// other name are purged on activation.
    #[serde(default = "default_version")]
    pub version: String,

    /// Origin of the controlled application.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Path to the SQLite cache database.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Static assets fetched and stored during install.
    #[serde(default = "default_precache_urls")]
    pub precache_urls: Vec<String>,

    /// Offline fallback document served when a navigation misses the cache.
    #[serde(default = "default_offline_url")]
    pub offline_url: String,

    /// Path prefix identifying API requests.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Path substrings marking auth-sensitive API requests.
    ///
    /// These must never touch the cache: a stale auth response could
    /// validate a dead session or fail a legitimate login.
    #[serde(default = "default_auth_markers")]
    pub auth_markers: Vec<String>,

    /// Endpoint queued offline orders are replayed against.
    #[serde(default = "default_orders_endpoint")]
    pub orders_endpoint: String,

    /// Sentinel path the foreground app stores the pending order batch under.
    #[serde(default = "default_pending_orders_key")]
    pub pending_orders_key: String,

    /// Sync tag that triggers the pending-order drain.
    #[serde(default = "default_sync_tag")]
    pub sync_tag: String,

    /// Admin order view, targeted by new-order notifications.
    #[serde(default = "default_admin_orders_path")]
    pub admin_orders_path: String,

    /// Customer order-tracking view, targeted by status notifications.
    #[serde(default = "default_customer_orders_path")]
    pub customer_orders_path: String,

    /// Notification icon asset path.
    #[serde(default = "default_notification_icon")]
    pub notification_icon: String,

    /// Notification badge asset path, also used for action button icons.
    #[serde(default = "default_notification_badge")]
    pub notification_badge: String,

    /// Timeout budget for navigation fetches, in milliseconds.
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,

    /// Timeout budget for API fetches, in milliseconds.
    #[serde(default = "default_api_timeout_ms")]
    pub api_timeout_ms: u64,

    /// Timeout budget for static asset fetches, in milliseconds.
    #[serde(default = "default_asset_timeout_ms")]
    pub asset_timeout_ms: u64,
}

fn default_version() -> String {
    "sanctum-cafe-v1.0.0".into()
}

fn default_origin() -> String {
    "http://localhost:3000".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./sanctum-sw-cache.sqlite")
}

fn default_precache_urls() -> Vec<String> {
    vec![
        "/".into(),
        "/static/js/bundle.js".into(),
        "/static/css/main.css".into(),
        "/manifest.json".into(),
        "/offline.html".into(),
    ]
}

fn default_offline_url() -> String {
    "/offline.html".into()
}

fn default_api_prefix() -> String {
    "/api/".into()
}

fn default_auth_markers() -> Vec<String> {
    vec!["/auth/".into(), "/verify".into(), "/refresh".into()]
}

fn default_orders_endpoint() -> String {
    "/api/orders".into()
}

fn default_pending_orders_key() -> String {
    "/offline-orders".into()
}

fn default_sync_tag() -> String {
    "background-sync-orders".into()
}

fn default_admin_orders_path() -> String {
    "/admin/orders".into()
}

fn default_customer_orders_path() -> String {
    "/customer/orders".into()
}

fn default_notification_icon() -> String {
    "/icons/icon-192x192.png".into()
}

fn default_notification_badge() -> String {
    "/icons/icon-96x96.png".into()
}

fn default_navigation_timeout_ms() -> u64 {
    10_000
}

fn default_api_timeout_ms() -> u64 {
    15_000
}

fn default_asset_timeout_ms() -> u64 {
    20_000
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            origin: default_origin(),
            db_path: default_db_path(),
            precache_urls: default_precache_urls(),
            offline_url: default_offline_url(),
            api_prefix: default_api_prefix(),
            auth_markers: default_auth_markers(),
            orders_endpoint: default_orders_endpoint(),
            pending_orders_key: default_pending_orders_key(),
            sync_tag: default_sync_tag(),
            admin_orders_path: default_admin_orders_path(),
            customer_orders_path: default_customer_orders_path(),
            notification_icon: default_notification_icon(),
            notification_badge: default_notification_badge(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
            api_timeout_ms: default_api_timeout_ms(),
            asset_timeout_ms: default_asset_timeout_ms(),
        }
    }
}

impl WorkerConfig {
    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SANCTUM_SW_`
    /// 2. TOML file from `SANCTUM_SW_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or parsed, or if
    /// validation fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SANCTUM_SW_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SANCTUM_SW_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Resolve an app-relative path against the configured origin.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl` when the origin or path cannot be parsed.
    pub fn page_url(&self, path: &str) -> Result<Url, Error> {
        Url::parse(&self.origin)
            .and_then(|origin| origin.join(path))
            .map_err(|e| Error::InvalidUrl(format!("{}{path}: {e}", self.origin)))
    }

    /// Whether a request path belongs to the API.
    pub fn is_api_path(&self, path: &str) -> bool {
        path.starts_with(&self.api_prefix)
    }

    /// Whether a request path is auth-sensitive and must bypass the cache.
    pub fn is_auth_path(&self, path: &str) -> bool {
        self.auth_markers.iter().any(|marker| path.contains(marker.as_str()))
    }

    /// Navigation fetch budget as a Duration.
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    /// API fetch budget as a Duration.
    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_ms)
    }

    /// Static asset fetch budget as a Duration.
    pub fn asset_timeout(&self) -> Duration {
        Duration::from_millis(self.asset_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WorkerConfig::default();
        assert_eq!(config.version, "sanctum-cafe-v1.0.0");
        assert_eq!(config.offline_url, "/offline.html");
        assert_eq!(config.precache_urls.len(), 5);
        assert!(config.precache_urls.contains(&config.offline_url));
        assert_eq!(config.api_prefix, "/api/");
        assert_eq!(config.sync_tag, "background-sync-orders");
    }

    #[test]
    fn test_page_url_resolution() {
        let config = WorkerConfig::default();
        let url = config.page_url("/admin/orders").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/admin/orders");
    }

    #[test]
    fn test_api_path_classification() {
        let config = WorkerConfig::default();
        assert!(config.is_api_path("/api/menu"));
        assert!(!config.is_api_path("/static/css/main.css"));
    }

    #[test]
    fn test_auth_path_markers() {
        let config = WorkerConfig::default();
        assert!(config.is_auth_path("/api/auth/login"));
        assert!(config.is_auth_path("/api/session/verify"));
        assert!(config.is_auth_path("/api/token/refresh"));
        assert!(!config.is_auth_path("/api/menu"));
    }

    #[test]
    fn test_timeout_durations() {
        let config = WorkerConfig::default();
        assert_eq!(config.navigation_timeout(), Duration::from_millis(10_000));
        assert_eq!(config.api_timeout(), Duration::from_millis(15_000));
        assert_eq!(config.asset_timeout(), Duration::from_millis(20_000));
    }
}
