use poker_tables::{config, SessionRegistry};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load config
    let config = config::Config::from_env();
    tracing::info!(
        "Starting table registry ({} seats, {}ms turns by default)",
        config.default_seats,
        config.default_turn_time_ms
    );

    let reconcile_every = tokio::time::Duration::from_secs(config.reconcile_interval_secs);
    let registry = Arc::new(SessionRegistry::new(config));

    // Spawn background task to repair drifted player mappings
    let registry_sweep = registry.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(reconcile_every);
        loop {
            interval.tick().await;
            registry_sweep.reconcile();
        }
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down, stopping {} tables", registry.len());

    for session in registry.find_all() {
        registry.stop_game(session.id());
    }

    Ok(())
}
