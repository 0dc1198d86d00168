//! Thin command-line transport for the scan orchestrator. Does no SSE
//! framing or persistence of its own — it builds the default probe
//! registry, drives one scan, and prints each event as it arrives.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use osint_http::{ClientConfig, PoliteClient};
use osint_orchestrator::{default_registry, Orchestrator, ScanConfig};

mod config_file;
mod output;

use output::{print_event, OutputFormat};

/// Run an OSINT self-assessment scan and stream the results.
#[derive(Parser)]
#[command(name = "osint-scan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Self-assessment OSINT scan orchestrator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scan against a single seed email.
    Scan(ScanArgs),
}

#[derive(Parser)]
struct ScanArgs {
    /// The seed email to scan. Must belong to the person running the scan.
    email: String,

    /// How many hops to run: 1 (email intel), 2 (+ username expansion), or
    /// 3 (+ correlation).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=3))]
    depth: u8,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// Optional TOML file overriding the default scan budgets.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bearer credential for code-hosting APIs (GitHub, etc). Prefer the
    /// environment variable over a shell history entry.
    #[arg(long, env = "OSINT_SCAN_BEARER_TOKEN", hide_env_values = true)]
    bearer_token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scan(args) => run_scan(args).await,
    }
}

async fn run_scan(args: ScanArgs) -> Result<()> {
    let mut scan_config = match &args.config {
        Some(path) => config_file::load(path)?,
        None => ScanConfig::default(),
    };
    scan_config.bearer_token = args.bearer_token;

    let client = PoliteClient::new(ClientConfig {
        bearer_token: scan_config.bearer_token.clone(),
        ..ClientConfig::default()
    })?;
    let registry = default_registry(client);
    let orchestrator = Orchestrator::new(scan_config, registry);

    let mut events = orchestrator.scan(args.email, args.depth);
    while let Some(event) = events.next().await {
        print_event(args.format, &event);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clap_parses_scan_subcommand() {
        let cli = Cli::try_parse_from(["osint-scan", "scan", "person@example.com", "--depth", "2"])
            .expect("parse scan");
        let Commands::Scan(args) = cli.command;
        assert_eq!(args.email, "person@example.com");
        assert_eq!(args.depth, 2);
    }

    #[test]
    fn clap_rejects_out_of_range_depth() {
        assert!(Cli::try_parse_from(["osint-scan", "scan", "person@example.com", "--depth", "9"]).is_err());
    }

    #[test]
    fn clap_requires_an_email() {
        assert!(Cli::try_parse_from(["osint-scan", "scan"]).is_err());
    }
}
