//! Flight board hub server.
//!
//! Serves the REST API and the `/ws` realtime endpoint from one listener.
//! Every event a handler publishes reaches the hub through the in-process bus.

use std::sync::Arc;

use axum::http::HeaderValue;
use tokio::signal;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use flight_board::adapters::http::{api_router, ApiState};
use flight_board::adapters::memory::{InMemoryAdvertisementRepository, InMemoryFlightRepository};
use flight_board::adapters::realtime::{realtime_router, RealtimeHub, RealtimeState, RoomManager};
use flight_board::adapters::InMemoryEventBus;
use flight_board::config::{AppConfig, ServerConfig};
use flight_board::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);

    info!(
        environment = ?config.server.environment,
        client_buffer = config.realtime.client_buffer,
        "Starting flight board hub"
    );

    let event_bus = Arc::new(InMemoryEventBus::new());
    let rooms = Arc::new(RoomManager::new());
    let hub = RealtimeHub::new_shared(rooms.clone());
    hub.register(event_bus.as_ref());

    let api_state = ApiState::new(
        Arc::new(InMemoryFlightRepository::new()),
        Arc::new(InMemoryAdvertisementRepository::new()),
        event_bus.clone(),
    );

    let app = api_router(api_state)
        .merge(realtime_router(RealtimeState::new(
            rooms,
            config.realtime.client_buffer,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, "Hub listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Hub stopped");
    Ok(())
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins = server.cors_origins_list();
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
