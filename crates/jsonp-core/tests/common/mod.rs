//! Common test utilities
//!
//! Loopback servers bound to ephemeral ports for client tests.

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::Router;
use jsonp_rs::{JsonpAppState, ResponderConfig, create_jsonp_router};
use tokio::net::TcpListener;

/// Serve `app` on 127.0.0.1 and return its address
pub async fn spawn_router(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Serve a JSONP responder with `config` and return its address
pub async fn spawn_responder(config: ResponderConfig) -> SocketAddr {
    config.validate().unwrap();
    let app = create_jsonp_router(&config).with_state(JsonpAppState::new(config));
    spawn_router(app).await
}

/// Address nothing listens on
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Script body exactly as the responder renders `{"name": "alice"}`
pub fn alice_body(callback: &str) -> String {
    format!("{callback}({{\n    \"name\": \"alice\"\n}});")
}
