//! Core types and shared state for the Sanctum Cafe offline worker.
//!
//! This crate provides:
//! - The versioned response cache with SQLite backend
//! - Request/response value types crossed at the interception boundary
//! - The network and connectivity boundary traits
//! - Worker configuration
//! - Unified error types

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod net;

pub use cache::CacheDb;
pub use config::WorkerConfig;
pub use error::Error;
pub use http::{Method, Request, RequestMode, Response};
pub use net::{Connectivity, Network};
