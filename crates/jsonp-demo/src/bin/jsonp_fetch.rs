//! Fetch a JSONP resource and print the data handed to the callback

use std::time::Duration;

use clap::Parser;
use jsonp_demo::{DemoResult, init_tracing, print_json};
use jsonp_rs::{CallbackName, FetcherConfig, JsonpFetcher};
use serde_json::Value as JsonValue;

#[derive(Parser)]
#[command(name = "jsonp-fetch")]
#[command(about = "Load a JSONP resource and print its data")]
struct Args {
    /// Resource URL
    #[arg(env = "JSONP_URL", default_value = "http://127.0.0.1:8081/seismic.jsonp")]
    url: String,

    /// Callback name to request
    #[arg(long, env = "JSONP_CALLBACK", default_value = CallbackName::FETCHER_DEFAULT)]
    callback: String,

    /// Use a freshly generated callback name instead of --callback
    #[arg(long, env = "JSONP_UNIQUE")]
    unique: bool,

    /// Give up after this many milliseconds
    #[arg(long, env = "JSONP_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Fetch plain JSON with no callback wrapping
    #[arg(long, env = "JSONP_PLAIN")]
    plain: bool,
}

#[tokio::main]
async fn main() -> DemoResult {
    init_tracing();
    let args = Args::parse();

    let mut config = FetcherConfig::default();
    if let Some(ms) = args.timeout_ms {
        config = config.with_timeout(Duration::from_millis(ms));
    }
    let fetcher = JsonpFetcher::new(config)?;

    let data: JsonValue = if args.plain {
        fetcher.get_json(&args.url).await?
    } else if args.unique {
        fetcher.fetch_unique(&args.url).await?
    } else {
        fetcher
            .fetch(&args.url, CallbackName::new(args.callback)?)
            .await?
    };

    print_json(&data)
}
