mod cli;
mod commands;
mod config;
mod docker;
mod env;
mod error;
mod ip;
mod profile;

use anyhow::{anyhow, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: cli::Cli) -> Result<ExitCode> {
    let start_dir = std::env::current_dir()?;
    let root = config::find_project_root(&start_dir).ok_or_else(|| {
        anyhow!("could not find docker-compose.yml; run this from a COESI project directory")
    })?;

    let ctx = config::Context {
        root,
        docker_bin: config::resolve_docker_binary(),
    };

    match cli.command {
        cli::Commands::Dev { ip } => commands::dev(&ctx, ip).await,
        cli::Commands::Prod { ip } => commands::prod(&ctx, ip).await,
        cli::Commands::Restart { profile } => commands::restart(&ctx, profile).await,
        cli::Commands::Stop { profile } => commands::stop(&ctx, profile).await,
        cli::Commands::Status { profile } => commands::status(&ctx, profile).await,
        cli::Commands::Logs { service, follow } => commands::logs(&ctx, service, follow).await,
        cli::Commands::Clean { profile, force } => commands::clean(&ctx, profile, force).await,
        cli::Commands::Ip { address } => commands::set_ip(&ctx, &address),
    }
}
