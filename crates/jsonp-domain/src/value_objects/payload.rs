//! Payload served by the responder

use serde::{Deserialize, Serialize};

/// Fixed record a responder serves, `{"name": "alice"}` unless configured
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Name carried by the record
    pub name: String,
}

impl Payload {
    /// Name served when none is configured
    pub const DEFAULT_NAME: &'static str = "alice";

    /// Create a payload carrying `name`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for Payload {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }
}
