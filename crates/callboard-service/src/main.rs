//! Callboard Service - coins, calls, achievements and leaderboard.
//!
//! This is the main entry point for the callboard service.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use callboard_core::ItemId;
use callboard_service::{create_router, AppState, ServiceConfig};
use callboard_store::{LikeStore, RocksStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,callboard=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Callboard Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        data_dir = %config.data_dir,
        calls_configured = %config.call_api_public_key.is_some(),
        identity_configured = %config.identity_access_token.is_some(),
        like_items = config.like_items,
        reconcile_interval_seconds = ?config.reconcile_interval_seconds,
        "Service configuration loaded"
    );

    // Initialize RocksDB store
    tracing::info!(path = %config.data_dir, "Opening RocksDB store");
    let store = Arc::new(RocksStore::open(&config.data_dir)?);

    let items: Vec<ItemId> = (1..=config.like_items).map(ItemId).collect();
    let seeded = store.seed_items(&items)?;
    tracing::info!(seeded, total = items.len(), "Like items ready");

    // Build app state
    let state = AppState::new(store, config.clone());

    if let Some(seconds) = config.reconcile_interval_seconds {
        spawn_reconciliation(&state, Duration::from_secs(seconds));
    }

    // Create the router
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically restore achievement unlocks missed by interrupted workflows.
fn spawn_reconciliation(state: &AppState, period: Duration) {
    let awarder = state.awarder();
    tracing::info!(period_seconds = period.as_secs(), "Achievement reconciliation enabled");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let awarder = awarder.clone();
            match tokio::task::spawn_blocking(move || awarder.reconcile()).await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => tracing::error!(error = %e, "Achievement reconciliation failed"),
                Err(e) => tracing::error!(error = %e, "Achievement reconciliation task panicked"),
            }
        }
    });
}
