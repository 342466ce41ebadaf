//! # JSONP
//!
//! Callback-wrapped JSON over HTTP. The responder serves
//! `<callback>(<json>);` for the callback a request names; the fetcher
//! requests a resource under a callback name, decodes the body and hands the
//! data to the call registered under that name.
//!
//! Instead of a shared global namespace, pending calls live in an explicit
//! [`CallbackRegistry`] that maps each callback name to a one-shot channel.
//!
//! The crate also carries the seismic tooling the demo binaries use: a
//! standing-order WebSocket feed, an FDSN catalog client and a
//! nearest-neighbour report over catalog snapshots.

#![warn(rust_2018_idioms)]

pub mod application;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod registry;

pub use application::{NeighbourLink, ProximityAnalyzer, ProximityReport};
pub use config::{
    CallbackPolicy, CatalogConfig, FeedConfig, FetcherConfig, JsonpConfig, ResponderConfig,
};
pub use error::{Error, Result};
pub use registry::{CallbackRegistry, PendingCall};

#[cfg(feature = "http-client")]
pub use infrastructure::client::{JsonpFetcher, QuakeCatalog, get_data_jsonp};
#[cfg(feature = "http-server")]
pub use infrastructure::http::{JsonpAppState, create_jsonp_router, serve};
#[cfg(feature = "websocket-client")]
pub use infrastructure::websocket::{FeedEvent, SeismicFeed};

pub use jsonp_domain::{
    CallbackName, DomainError, DomainResult, GeoPoint, Payload, Quake, ScriptBody,
};

/// Re-export commonly used types
pub mod prelude {
    pub use super::{
        CallbackName, CallbackPolicy, CallbackRegistry, Error, FetcherConfig, Payload,
        PendingCall, ResponderConfig, Result, ScriptBody,
    };
}
