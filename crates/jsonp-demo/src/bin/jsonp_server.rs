//! Serve the JSONP payload over HTTP

use std::net::SocketAddr;

use clap::Parser;
use jsonp_demo::{DemoResult, init_tracing};
use jsonp_rs::{CallbackPolicy, Payload, ResponderConfig, serve};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "jsonp-server")]
#[command(about = "Serve a JSON payload wrapped in the caller's callback")]
struct Args {
    /// Address to listen on
    #[arg(long, env = "JSONP_BIND", default_value = "127.0.0.1:8081")]
    bind: SocketAddr,

    /// Route of the script endpoint
    #[arg(long, env = "JSONP_PATH", default_value = "/seismic.jsonp")]
    path: String,

    /// Value of the payload's `name` field
    #[arg(long, env = "JSONP_NAME", default_value = Payload::DEFAULT_NAME)]
    name: String,

    /// Only echo callbacks that are plain JavaScript identifier paths
    #[arg(long, env = "JSONP_STRICT_CALLBACKS")]
    strict_callbacks: bool,
}

#[tokio::main]
async fn main() -> DemoResult {
    init_tracing();
    let args = Args::parse();

    let policy = if args.strict_callbacks {
        CallbackPolicy::Identifier
    } else {
        CallbackPolicy::Verbatim
    };
    let config = ResponderConfig::default()
        .with_bind_addr(args.bind)
        .with_path(args.path)
        .with_policy(policy)
        .with_payload(Payload::new(args.name));
    config.validate()?;

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(
        "try: curl 'http://{}{}?callback=handleData'",
        listener.local_addr()?,
        config.path
    );

    serve(listener, config).await?;
    Ok(())
}
