//! Infrastructure layer - HTTP and WebSocket adapters
//!
//! Each adapter sits behind its own cargo feature so embedders can take
//! just the responder or just the clients.

#[cfg(feature = "http-client")]
pub mod client;
#[cfg(feature = "http-server")]
pub mod http;
#[cfg(feature = "websocket-client")]
pub mod websocket;
