//! SQLite-backed versioned response cache.
//!
//! Stores full request/response pairs keyed by request identity inside a
//! named, versioned store. There is no per-entry expiry: version bumps are
//! the sole invalidation mechanism, and activation deletes every store
//! whose name differs from the current version tag. It supports:
//!
//! - SHA-256 entry keys over method + URL
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - A sentinel entry holding the pending offline order batch

pub mod connection;
pub mod entries;
pub mod hash;
pub mod migrations;
pub mod orders;

pub use crate::Error;

pub use connection::CacheDb;
