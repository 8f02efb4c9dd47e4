//! Configuration validation rules.
//!
//! This module provides validation logic for `WorkerConfig` values after
//! they have been loaded from environment, files, or defaults.

use crate::config::WorkerConfig;
use thiserror::Error;
use url::Url;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl WorkerConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `version` is empty
    /// - `origin` is not an absolute URL with a host
    /// - `precache_urls` is empty or contains a non-rooted path
    /// - `api_prefix` does not start and end with `/`
    /// - any timeout budget is below 100ms or above 5 minutes
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version.is_empty() {
            return Err(ConfigError::Invalid { field: "version".into(), reason: "must not be empty".into() });
        }

        match Url::parse(&self.origin) {
            Ok(url) if url.host_str().is_some() => {}
            _ => {
                return Err(ConfigError::Invalid {
                    field: "origin".into(),
                    reason: "must be an absolute URL with a host".into(),
                });
            }
        }

        if self.precache_urls.is_empty() {
            return Err(ConfigError::Invalid { field: "precache_urls".into(), reason: "must not be empty".into() });
        }
        for path in &self.precache_urls {
            if !path.starts_with('/') {
                return Err(ConfigError::Invalid {
                    field: "precache_urls".into(),
                    reason: format!("path {path:?} must start with '/'"),
                });
            }
        }

        if !self.api_prefix.starts_with('/') || !self.api_prefix.ends_with('/') {
            return Err(ConfigError::Invalid {
                field: "api_prefix".into(),
                reason: "must start and end with '/'".into(),
            });
        }

        for (field, value) in [
            ("navigation_timeout_ms", self.navigation_timeout_ms),
            ("api_timeout_ms", self.api_timeout_ms),
            ("asset_timeout_ms", self.asset_timeout_ms),
        ] {
            if value < 100 {
                return Err(ConfigError::Invalid { field: field.into(), reason: "must be at least 100ms".into() });
            }
            if value > 300_000 {
                return Err(ConfigError::Invalid {
                    field: field.into(),
                    reason: "must not exceed 5 minutes (300000ms)".into(),
                });
            }
        }

        if !self.precache_urls.contains(&self.offline_url) {
            tracing::warn!(
                offline_url = %self.offline_url,
                "offline_url is not in precache_urls; the fallback document \
                 will only be available after a successful live fetch"
            );
        }

        Ok(())
    }
}
