//! HTTP responder implementation

pub mod middleware;
pub mod responder;

pub use middleware::JsonpMiddleware;
pub use responder::{
    JAVASCRIPT_CONTENT_TYPE, JsonpAppState, ResponderError, create_jsonp_router, serve,
};
