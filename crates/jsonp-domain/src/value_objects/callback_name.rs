//! Callback name value object
//!
//! A callback name is echoed verbatim into the response body, so the only
//! structural rule enforced on construction is that it is non-empty.
//! Stricter checks are opt-in through [`CallbackName::is_identifier`].

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DomainError, DomainResult};

/// Name of the function a JSONP body calls with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CallbackName(String);

impl CallbackName {
    /// Name a responder falls back to when the request carries none
    pub const RESPONDER_DEFAULT: &'static str = "callback";

    /// Name a fetcher registers when the caller supplies none
    pub const FETCHER_DEFAULT: &'static str = "handleData";

    /// Prefix used for generated per-call names
    pub const UNIQUE_PREFIX: &'static str = "jsonp_";

    /// Create a callback name from arbitrary text
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidCallbackName`] if the text is empty.
    pub fn new(name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(DomainError::InvalidCallbackName(
                "callback name must not be empty".to_string(),
            ));
        }
        Ok(Self(name))
    }

    /// The responder's fallback name (`callback`)
    #[must_use]
    pub fn responder_default() -> Self {
        Self(Self::RESPONDER_DEFAULT.to_string())
    }

    /// The fetcher's fallback name (`handleData`)
    #[must_use]
    pub fn fetcher_default() -> Self {
        Self(Self::FETCHER_DEFAULT.to_string())
    }

    /// Generate a name no other call will share, e.g. `jsonp_3f2a...`
    #[must_use]
    pub fn unique() -> Self {
        Self(format!("{}{}", Self::UNIQUE_PREFIX, Uuid::new_v4().simple()))
    }

    /// Whether the name is a dotted path of JavaScript identifiers
    /// (`handleData`, `$jq`, `app.callbacks.onData`)
    ///
    /// Only ASCII identifier characters are accepted.
    #[must_use]
    pub fn is_identifier(&self) -> bool {
        self.0.split('.').all(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => chars
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$'),
                _ => false,
            }
        })
    }

    /// Borrow the raw name
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the raw name
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CallbackName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CallbackName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CallbackName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for CallbackName {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CallbackName> for String {
    fn from(name: CallbackName) -> Self {
        name.0
    }
}
