//! HTTP API for the network state store.
//!
//! Exposes the single `NetworkState` record over two endpoints
//! (`GET /api/network`, `PUT /api/network`) and provides the matching
//! client used to keep a local copy of the aggregate in sync with the
//! store (fetch on load, push the whole aggregate on every change).

pub mod client;
pub mod config;
pub mod server;

pub use client::{NetworkClient, SyncSession};
pub use config::ApiConfig;
pub use server::ApiServer;
