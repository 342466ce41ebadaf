//! # JSONP Demo
//!
//! Command-line front ends for the JSONP responder and fetcher and for the
//! seismic feed tooling. Shared setup for the binaries lives here.

use tracing_subscriber::EnvFilter;

/// Result type returned by the demo binaries
pub type DemoResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Install the fmt subscriber, filtered by `RUST_LOG` (default `info`)
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

/// Write `value` to stdout as pretty JSON
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> DemoResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
