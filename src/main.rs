#![cfg(not(tarpaulin_include))]

use clap::Parser;
use csv_viewer::{Config, app};

/// Main entry point for the CSV viewer
///
/// Reads settings from the command line and environment, sets up logging and
/// runs the web server until the process is stopped.
///
/// # Default Configuration
/// * Listens on 0.0.0.0:8000 and serves assets from `./static`
/// * Log level `info`, overridable through `RUST_LOG`
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Success or error object
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    log::info!(
        "Starting csv-viewer v{} on {}",
        env!("CARGO_PKG_VERSION"),
        config.socket_addr()
    );

    app::run(config).await
}
