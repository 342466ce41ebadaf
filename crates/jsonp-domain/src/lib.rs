//! JSONP Domain Layer - Pure Logic
//!
//! This crate contains the transport-free pieces of the JSONP exchange:
//! callback names, the served payload, and the `<callback>(<json>);`
//! script body that carries one between responder and fetcher.
//!
//! ## Architecture
//!
//! - **Value Objects**: Immutable concepts defined by their attributes
//!   (`CallbackName`, `Payload`, `GeoPoint`)
//! - **Script**: Rendering and parsing of callback-wrapped JSON
//! - **Seismic**: Catalog entries served by FDSN event endpoints

#![warn(missing_docs)]

pub mod script;
pub mod seismic;
pub mod value_objects;

pub use script::ScriptBody;
pub use seismic::{FeatureCollection, Quake, QuakeProperties};
pub use value_objects::{CallbackName, GeoPoint, Payload};

/// Domain Result type
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-specific errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DomainError {
    /// Body is not a `<callback>(<json>);` expression
    #[error("Malformed script body: {0}")]
    MalformedScript(String),

    /// Callback name cannot be used
    #[error("Invalid callback name: {0}")]
    InvalidCallbackName(String),

    /// JSON (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}
