mod cli;
mod config;
mod daemon;
mod dispatch;
mod input;
mod press;

use clap::Parser;
use cli::Cli;
use config::DaemonConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("powerbuttond=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = DaemonConfig::from_env();

    if let Err(e) = daemon::run(config, cli.devices).await {
        tracing::error!(error = %e, "daemon failed");
        eprintln!("powerbuttond: {e}");
        std::process::exit(1);
    }
}
