//! Print events from the seismic standing-order feed as they arrive

use std::time::Duration;

use clap::Parser;
use jsonp_demo::{DemoResult, init_tracing, print_json};
use jsonp_rs::{FeedConfig, SeismicFeed};
use serde_json::json;
use tracing::error;

#[derive(Parser)]
#[command(name = "seismic-feed")]
#[command(about = "Stream live earthquake notifications")]
struct Args {
    /// WebSocket gateway
    #[arg(long, env = "SEISMIC_GATEWAY", default_value = "wss://www.seismicportal.eu/standing_order/websocket")]
    gateway: String,

    /// Seconds between keep-alive pings
    #[arg(long, env = "SEISMIC_PING_INTERVAL", default_value_t = 15)]
    ping_interval: u64,
}

#[tokio::main]
async fn main() -> DemoResult {
    init_tracing();
    let args = Args::parse();

    let config = FeedConfig::default()
        .with_gateway(args.gateway)
        .with_ping_interval(Duration::from_secs(args.ping_interval));
    let (mut events, handle) = SeismicFeed::new(config).subscribe();

    while let Some(event) = events.recv().await {
        print_json(&event)?;
    }

    if let Err(err) = handle.await? {
        error!(%err, "seismic feed failed");
        print_json(&json!({
            "error": err.to_string(),
            "error_type": err.kind(),
        }))?;
        return Err(err.into());
    }
    Ok(())
}
