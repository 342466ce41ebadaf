//! HTTP clients

pub mod catalog;
pub mod fetcher;

pub use catalog::QuakeCatalog;
pub use fetcher::{JsonpFetcher, get_data_jsonp};
