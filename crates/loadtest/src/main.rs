//! storeload - goose load test against the inventory/order API.
//!
//! # Usage
//!
//! ```bash
//! # 50 users, 5 started per second, for 10 minutes
//! storeload -u 50 -r 5 -t 10m
//!
//! # Against another backend, with an HTML report
//! STORELOAD_HOST=https://staging.example.com storeload -u 20 -t 5m --report-file report.html
//! ```
//!
//! All command-line flags are goose's own; see `storeload --help`. Scenario
//! settings come from the environment (see [`storeload::config`]).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use goose::prelude::*;
use storeload::{LoadConfig, scenario, telemetry};
use tracing::info;

#[tokio::main]
async fn main() {
    telemetry::init();

    let result: Result<(), Box<dyn std::error::Error>> = run().await;

    if let Err(e) = result {
        tracing::error!("Load test failed: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(LoadConfig::from_env()?);
    info!(
        host = %config.host,
        sales_weight = config.role_weights.sales(),
        manager_weight = config.role_weights.central_manager(),
        accounts = config.credentials.iter().count(),
        "Starting load test"
    );

    GooseAttack::initialize()?
        .register_scenario(scenario::mixed_user(&config)?)
        .set_default(GooseDefault::Host, config.host.as_str())?
        .execute()
        .await?;

    Ok(())
}
