//! Flight display client.
//!
//! Connects to the hub, follows its airport and the global topic, rotates
//! advertisements and keeps a filtered flight board up to date.

use std::sync::Arc;

use tokio::signal;
use tracing::info;

use flight_board::adapters::client::{ConnectionManager, HttpDisplayApi, Subscriptions, WsConnector};
use flight_board::application::{AdRotationEngine, FlightBoard, ScheduledTask};
use flight_board::config::AppConfig;
use flight_board::domain::realtime::{control, EventKind, Topic};
use flight_board::ports::DisplayApi;
use flight_board::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);

    let airport = config.client.airport_code()?;
    info!(airport = %airport, hub = %config.client.ws_url, "Starting flight display");

    let api: Arc<dyn DisplayApi> = Arc::new(HttpDisplayApi::new(
        config.client.api_base_url.clone(),
        config.client.request_timeout(),
    )?);
    let connector = Arc::new(WsConnector::new(
        config.client.ws_url.clone(),
        config.realtime.client_buffer,
    ));
    let connection = ConnectionManager::new(connector, config.client.connection_settings());
    let subscriptions = Subscriptions::new(connection.clone());

    let engine = Arc::new(
        AdRotationEngine::new(api.clone(), airport.clone(), config.rotation.settings())
            .with_layout_callback(|layout| info!(layout = ?layout, "Layout changed")),
    );
    let mut board = FlightBoard::new(api, airport.clone());
    if let Some(flight_type) = config.client.flight_type {
        board = board.with_flight_type(flight_type);
    }
    let board = Arc::new(board);

    // Membership is lost with the link; rejoin after every (re)connect.
    let topics = vec![Topic::airport(airport.clone()), Topic::Global];
    let weak_connection = Arc::downgrade(&connection);
    subscriptions.on(control::CONNECT, move |_| {
        let Some(connection) = weak_connection.upgrade() else {
            return;
        };
        let topics = topics.clone();
        tokio::spawn(async move {
            for topic in &topics {
                connection.join(topic).await;
            }
        });
    });

    for name in EventKind::advertisement_channel_names() {
        let engine = Arc::downgrade(&engine);
        subscriptions.on(name, move |payload| {
            if let Some(engine) = engine.upgrade() {
                engine.on_advertisement_event(payload);
            }
        });
    }

    for name in EventKind::flight_channel_names() {
        let board = Arc::downgrade(&board);
        subscriptions.on(name, move |_| {
            if let Some(board) = board.upgrade() {
                tokio::spawn(async move {
                    board.refresh().await;
                });
            }
        });
    }

    connection.connect();
    engine.start().await;
    board.refresh().await;

    // The periodic refetch also restarts a connection driver that gave up.
    let board_refresh = {
        let board = board.clone();
        let connection = Arc::downgrade(&connection);
        ScheduledTask::every("flight-board-refresh", config.rotation.refetch_period(), move || {
            let board = board.clone();
            let connection = connection.upgrade();
            async move {
                if connection.map_or(false, |connection| connection.ensure_connected()) {
                    info!("Realtime link down, retrying connection");
                }
                board.refresh().await;
                true
            }
        })
    };

    signal::ctrl_c().await?;
    info!("Shutting down flight display");

    drop(board_refresh);
    engine.stop();
    subscriptions.dispose();
    connection.disconnect();
    Ok(())
}
