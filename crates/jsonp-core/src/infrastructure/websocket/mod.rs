//! WebSocket clients

pub mod feed;

pub use feed::{FeedEvent, MessageFormat, PingEvent, RawMessage, SeismicFeed, decode_message};
