//! Error types for JSONP operations

use jsonp_domain::DomainError;

/// Result type alias for JSONP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for JSONP operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Resource failed to load (network failure or non-success status)
    #[error("Failed to load {url}: {message}")]
    Load {
        /// URL that was requested
        url: String,
        /// Failure description
        message: String,
    },

    /// URL could not be parsed or resolved
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Another call is already pending under this callback name
    #[error("Callback '{0}' already has a pending call")]
    CallbackInUse(String),

    /// Response invoked a callback nobody registered
    #[error("Callback '{0}' is not registered")]
    UnregisteredCallback(String),

    /// Pending call was dropped before its callback fired
    #[error("Pending call for '{0}' was abandoned")]
    Abandoned(String),

    /// Domain rule violation (malformed script, bad callback name)
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(String),

    /// WebSocket transport failure
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Configuration rejected
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),
}

impl Error {
    /// Create a load error
    pub fn load(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Load {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Short machine-readable kind, e.g. `load` or `websocket`
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Load { .. } => "load",
            Error::InvalidUrl(_) => "invalid_url",
            Error::CallbackInUse(_) => "callback_in_use",
            Error::UnregisteredCallback(_) => "unregistered_callback",
            Error::Abandoned(_) => "abandoned",
            Error::Domain(_) => "domain",
            Error::Json(_) => "json",
            Error::WebSocket(_) => "websocket",
            Error::Config(_) => "config",
            Error::Io(_) => "io",
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::InvalidUrl(err.to_string())
    }
}

#[cfg(feature = "http-client")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        Error::load(url, err.to_string())
    }
}

#[cfg(feature = "websocket-client")]
impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket(err.to_string())
    }
}
