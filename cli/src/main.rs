//! shipstack CLI - one command from an app name to a live deployment

#![cfg_attr(test, allow(clippy::expect_used))]

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use shipstack_cli::cli::Cli;
use shipstack_cli::domain::error::error_code;
use shipstack_cli::output::json::format_error;

/// Environment variable holding the `tracing` filter directives.
const LOG_ENV: &str = "SHIPSTACK_LOG";

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let json = cli.wants_json();
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            if json {
                let message = format!("{e:#}");
                match format_error(&message, error_code(&e)) {
                    Ok(text) => println!("{text}"),
                    Err(_) => eprintln!("Error: {message}"),
                }
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
