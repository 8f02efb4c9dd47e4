//! Host-side backends for the offline worker's environment boundaries.
//!
//! This crate provides the network and connectivity implementations the
//! worker is wired to in production; tests substitute mocks.

pub mod net;

pub use net::{HttpNetwork, NetConfig, OnlineStatus};
