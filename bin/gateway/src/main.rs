//! The spyglass gateway binary.

use anyhow::Result;
use clap::Parser;
use tracing::info;

mod cli;
mod config;
mod envelope;
mod errors;
mod server;
mod service;
mod telemetry;

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    telemetry::init(cli.v)?;

    let cfg = config::GatewayConfig::from_cli(cli)?;
    info!(
        target: "gateway",
        oracle = %cfg.oracle_address,
        delay = cfg.delay,
        "starting gateway"
    );

    // Construct every component up front; nothing is built lazily on the
    // request path.
    let service = service::ProofService::new(&cfg)?;
    server::serve(&cfg, service).await?;

    info!(target: "gateway", "gateway shut down");
    Ok(())
}
