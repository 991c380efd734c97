//! rhuictl - scripted driver for the RHUI administration console

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rhuictl::cli::Cli;
use rhuictl::domain::ConsoleError;
use rhuictl::output::OutputContext;
use rhuictl::output::json::format_error;

/// Log level for the `-v` count; `RUST_LOG` wins when set.
fn default_filter(verbose: u8) -> EnvFilter {
    let level = match verbose {
        0 => "warn",
        1 => "rhuictl=debug",
        _ => "rhuictl=trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(default_filter(cli.verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let (json, no_color) = (cli.json, cli.no_color);
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            let code = e
                .downcast_ref::<ConsoleError>()
                .map_or("ERROR", ConsoleError::code);
            if json {
                match format_error(&format!("{e:#}"), code) {
                    Ok(text) => println!("{text}"),
                    Err(_) => eprintln!("Error: {e:#}"),
                }
            } else {
                OutputContext::new(no_color, false).error(&format!("{e:#}"));
            }
            ExitCode::FAILURE
        }
    }
}
