#![cfg(not(tarpaulin_include))]

use absentee_report::app::{self, ServerConfig};
use std::env;

/// Main entry point for the web application
///
/// Reads `[addr] [upload_limit_mib]` from the command line and serves the
/// upload page until the process is stopped.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let config = ServerConfig::from_args(&args);

    app::run(config).await
}
