//! Mini Memcache workload driver
//!
//! Runs a synthetic workload against the cache engine and prints a JSON
//! summary of the run.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_memcache::{run_workload, CacheStore, Config};

/// Main entry point for the workload driver.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create cache store with the configured capacity
/// 4. Run the workload and print the report
fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_memcache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting Mini Memcache workload driver");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_size={}, workload_ops={}, workload_ttl={}s",
        config.max_size, config.workload_ops, config.workload_ttl
    );

    let mut cache = CacheStore::new(config.max_size);
    let report = run_workload(&mut cache, config.workload_ops, config.workload_ttl);
    info!(
        "Workload complete: {} gets, {} hits, final size {}, {}us",
        report.gets, report.hits, report.final_size, report.elapsed_us
    );

    let json = serde_json::to_string_pretty(&report).context("failed to encode report")?;
    println!("{json}");
    Ok(())
}
