//! Web front end for HyperChat.
//!
//! This module provides the WebSocket endpoint chat clients connect to,
//! plus a health check and static file serving for the browser client.

pub mod cors;
pub mod router;
pub mod server;
pub mod ws;

pub use router::create_router;
pub use server::WebServer;
