//! API Module
//!
//! HTTP handlers and routing over the org/session cache facade.
//!
//! # Endpoints
//! - `PUT /org` - Store a key-value pair in the org cache
//! - `PUT /session` - Store a key-value pair in the session cache
//! - `GET /get/:key` - Retrieve a value, session first
//! - `GET /contains/:key` - Check whether either scope holds a key
//! - `POST /reload` - Reload both caches from their partitions
//! - `GET /stats` - Get packing statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
