//! For each recent quake, report its three nearest neighbours

use clap::Parser;
use jsonp_demo::{DemoResult, init_tracing, print_json};
use jsonp_rs::{CatalogConfig, ProximityAnalyzer, QuakeCatalog};
use tracing::info;

#[derive(Parser)]
#[command(name = "quake-proximity")]
#[command(about = "Nearest neighbours of recent catalog events")]
struct Args {
    /// FDSN event query endpoint
    #[arg(long, env = "QUAKE_ENDPOINT", default_value = "https://www.seismicportal.eu/fdsnws/event/1/query")]
    endpoint: String,

    /// Number of events to fetch
    #[arg(long, env = "QUAKE_LIMIT", default_value_t = 100)]
    limit: usize,
}

#[tokio::main]
async fn main() -> DemoResult {
    init_tracing();
    let args = Args::parse();

    let config = CatalogConfig::default()
        .with_endpoint(args.endpoint)
        .with_limit(args.limit);
    let analyzer = ProximityAnalyzer::new(config.neighbours);
    let quakes = QuakeCatalog::new(config)?.recent().await?;

    let reports = analyzer.analyze(&quakes);
    info!(quakes = quakes.len(), "proximity reports ready");

    for (quake, report) in quakes.iter().zip(&reports) {
        info!(id = %quake.id, "{}", quake.summary());
        for link in &report.closest {
            info!("  {:>8.1} km  {}", link.distance_km, link.to.summary());
        }
    }

    print_json(&reports)
}
