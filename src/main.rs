use std::net::IpAddr;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sea_local_home::api::ApiServer;
use sea_local_home::{Config, HttpTransport};

/// Sea bridge - local fulfillment server for the sea sensor
#[derive(Parser)]
#[command(name = "sea-bridge", version, about)]
struct Cli {
    /// Address to bind (overrides config)
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to listen on (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,sea_local_home=info",
        1 => "info,sea_local_home=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    tracing::debug!(?config, "loaded configuration");

    let transport = Arc::new(HttpTransport::new()?);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting sea local-home bridge"
    );

    ApiServer::new(transport, &config.server).run().await?;

    Ok(())
}
