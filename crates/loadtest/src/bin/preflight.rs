//! storeload-preflight - verify load test accounts before a run.
//!
//! # Usage
//!
//! ```bash
//! # Every account, managers probe all stores
//! storeload-preflight
//!
//! # Salespeople only, against another backend
//! storeload-preflight --host https://staging.example.com --role sales
//!
//! # Managers probe one random store each
//! storeload-preflight --role central-manager --sample
//! ```
//!
//! Exits with status 1 if any login fails.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::Parser;
use storeload::config::parse_host;
use storeload::preflight::{self, PreflightOptions, RoleFilter};
use storeload::{BackendClient, LoadConfig, telemetry};

#[derive(Parser)]
#[command(name = "storeload-preflight")]
#[command(author, version, about = "Check load test accounts and store bindings")]
struct Cli {
    /// Backend base URL (overrides `STORELOAD_HOST`)
    #[arg(long)]
    host: Option<String>,

    /// Accounts to check
    #[arg(long, value_enum, default_value_t = RoleFilter::All)]
    role: RoleFilter,

    /// Probe one random store per manager instead of every store
    #[arg(long)]
    sample: bool,
}

#[tokio::main]
async fn main() {
    telemetry::init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!("Preflight failed: {e}");
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when any login failed.
async fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let config = LoadConfig::from_env()?;
    let host = match cli.host {
        Some(raw) => parse_host("--host", &raw)?,
        None => config.host,
    };

    let client = BackendClient::new(host, config.timeouts)?;
    tracing::info!(
        host = %client.base(),
        role = ?cli.role,
        sample = cli.sample,
        "Running preflight"
    );

    let options = PreflightOptions {
        roles: cli.role,
        sample: cli.sample,
    };
    let report = preflight::run(&client, &config.credentials, options).await;
    report.log();

    Ok(!report.has_login_failures())
}
