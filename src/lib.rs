//! Stream Status Proxy Library
//!
//! This library provides the core functionality for the stream status proxy:
//! a single endpoint that asks Cloudflare Stream for the state of one live
//! input and relays a reduced `{"status": ...}` JSON body to the caller.
//! A companion `stream_monitor` binary polls the input's lifecycle endpoint
//! and reports live/offline transitions.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Domain models and errors.
//! - `integrations`: External service integrations.
//! - `cloudflare_client`: Cloudflare Stream API client.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `lifecycle_client`: Stream lifecycle endpoint client.
//! - `models`: Response models and status extraction.
//! - `monitor`: Debounced live/offline monitor.
//! - `routes`: Router and middleware assembly.

pub mod api;
pub mod core;
pub mod integrations;

// Re-export primary modules for shared use in tests and the binary
pub mod cloudflare_client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod lifecycle_client;
pub mod models;
pub mod monitor;
pub mod routes;
