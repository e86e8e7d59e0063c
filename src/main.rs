use std::sync::Arc;

use homegrown_dispatch::api;
use homegrown_dispatch::config::Config;
use homegrown_dispatch::engine::clock::SimulationClock;
use homegrown_dispatch::engine::market::Marketplace;
use homegrown_dispatch::error::AppError;
use homegrown_dispatch::state::AppState;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    let rng = match config.sim_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let warehouse = config.warehouse();
    tracing::info!(
        warehouse = %warehouse.name,
        lat = warehouse.location.lat,
        lng = warehouse.location.lng,
        "warehouse configured"
    );

    let mut market = Marketplace::new(warehouse, rng);
    if config.seed_listings {
        market.seed_catalogue();
    }

    let shared_state = Arc::new(AppState::new(market, config.event_buffer_size));
    let app = api::rest::router(shared_state.clone());

    let clock = SimulationClock::start(shared_state.clone(), config.tick_period());

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(http_port = config.http_port, "http server started");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")));

    clock.stop().await;
    served
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
