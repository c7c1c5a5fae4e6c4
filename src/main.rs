//! Resolver Cache - DNS response cache inspection daemon
//!
//! Hosts the shared response cache, its expiry sweep and the HTTP
//! inspection endpoint.

use std::sync::Arc;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use resolver_cache::{spawn_sweep_task, Config, DnsCache, InspectionServer};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the positive and negative caches
/// 4. Start the background expiry sweep, unless disabled
/// 5. Start the inspection endpoint
/// 6. Stop everything on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "resolver_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resolver cache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: inspect_addr={}, shards={}, sweep_interval={}s, shutdown_grace={}s",
        config.inspect_addr, config.shards, config.sweep_interval, config.shutdown_grace
    );

    let cache = Arc::new(DnsCache::from_config(&config));
    info!(
        "Cache initialized with {} partitions per store",
        cache.shard_count()
    );

    let sweep_handle = (config.sweep_interval > 0)
        .then(|| spawn_sweep_task(Arc::clone(&cache), config.sweep_interval));

    let server = InspectionServer::from_config(Arc::clone(&cache), &config);
    server.start().await?;

    shutdown_signal().await?;

    if let Some(handle) = sweep_handle {
        handle.abort();
        warn!("Expiry sweep task aborted");
    }

    // a shutdown timeout is reported, not fatal
    if let Err(err) = server.stop().await {
        warn!(error = %err, "Inspection endpoint did not stop cleanly");
    }

    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = signal::ctrl_c() => {
                result?;
                info!("Received Ctrl+C, initiating shutdown...");
            }
            _ = terminate.recv() => {
                info!("Received SIGTERM, initiating shutdown...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await?;
        info!("Received Ctrl+C, initiating shutdown...");
    }

    Ok(())
}
