//! SkySpear Scan - Standalone Binary
//!
//! Connects the built-in inventory adapters for every platform that has
//! credentials in the environment, runs one scan and prints the JSON report.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use skyspear_engine::providers::{InventoryProviderFactory, ResourceInventory};
use skyspear_engine::{CloudCredentials, EngineConfig, GovernancePlatform, ScanOptions, ScanOutcome};

/// SkySpear Scan - multi-cloud cost and security scan
#[derive(Parser, Debug)]
#[command(name = "skyspear-scan", version, about)]
struct Args {
    /// Resource inventory (JSON) backing the built-in adapters
    #[arg(long, env = "SKYSPEAR_INVENTORY")]
    inventory: Option<PathBuf>,

    /// Skip resource discovery; cost and security run on an empty input
    #[arg(long, default_value = "false")]
    skip_resources: bool,

    /// Skip cost analysis
    #[arg(long, default_value = "false")]
    skip_costs: bool,

    /// Skip security analysis
    #[arg(long, default_value = "false")]
    skip_security: bool,

    /// Region filter, may be repeated (advisory)
    #[arg(long = "region")]
    regions: Vec<String>,

    /// Pretty-print the report
    #[arg(long, default_value = "false")]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = EngineConfig::from_env().context("Failed to load engine configuration")?;

    // Initialize logging; stdout is reserved for the report
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!(
        inventory = ?args.inventory,
        failure_policy = %config.failure_policy,
        "Starting SkySpear scan"
    );

    let inventory = match &args.inventory {
        Some(path) => ResourceInventory::from_file(path)
            .with_context(|| format!("Failed to load inventory {}", path.display()))?,
        None => ResourceInventory::default(),
    };

    let credentials = CloudCredentials::from_env();
    if credentials.is_empty() {
        warn!("No cloud credentials found in environment, scanning with no providers");
    }

    let mut platform = GovernancePlatform::new(config, Arc::new(InventoryProviderFactory::new(inventory)));
    platform
        .connect_providers(&credentials)
        .await
        .context("Failed to connect cloud providers")?;

    let options = ScanOptions {
        include_resources: !args.skip_resources,
        include_costs: !args.skip_costs,
        include_security: !args.skip_security,
        regions: args.regions.clone(),
    };

    let outcome = platform.scan_environment_report(&options).await;

    let report = match &outcome {
        ScanOutcome::Succeeded(results) => serde_json::to_value(results)?,
        ScanOutcome::Failed { metadata, error } => serde_json::json!({
            "error": error.to_string(),
            "metadata": metadata,
        }),
    };

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", rendered);

    outcome.into_result().context("Scan did not complete")?;
    Ok(())
}
