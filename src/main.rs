use std::process::ExitCode;

use advisor::cli::{Cli, Command};
use advisor::config::ServerConfig;
use advisor::core::{UserProfile, compute};
use advisor::{api, telemetry};
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    match Cli::parse().command {
        Command::Serve(args) => {
            let config = ServerConfig::from(args);
            telemetry::init_tracing(config.log_format);

            let addr = match config.socket_addr() {
                Ok(addr) => addr,
                Err(e) => {
                    tracing::error!(error = %e, "invalid server configuration");
                    return ExitCode::FAILURE;
                }
            };
            if let Err(e) = api::run_http_server(addr).await {
                tracing::error!(error = %e, "server error");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Command::Recommend(args) => {
            let allocation = compute(&UserProfile::from(args));
            match serde_json::to_string_pretty(&allocation) {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Failed to serialize allocation: {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
