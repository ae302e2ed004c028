//! Donation relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin donation-relay-server
//! cargo run --bin donation-relay-server -- --port 5679 --data-dir ./data
//! PORT=8080 DONATION_RELAY_REQUIRE_PORT=true cargo run --bin donation-relay-server
//! ```

use std::{collections::HashMap, sync::Arc};

use clap::Parser;
use donation_relay_server::{
    config::{Args, Config},
    domain::ConnectionTable,
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{FileLedgerRepository, InMemoryConnectionRegistry, LedgerPaths},
    },
    ui::{
        AppState, Server, shutdown_signal,
        task::{ChannelStatusReporter, DailyResetScheduler},
    },
};
use donation_relay_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};
use tokio::sync::Mutex;

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = match Config::from_args(Args::parse()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize dependencies in order:
    // 1. Stores
    // 2. MessagePusher
    // 3. AppState (UseCases)
    // 4. Background tasks
    // 5. Server

    // 1. Create stores (the ledger loads any existing snapshot)
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let ledger = Arc::new(FileLedgerRepository::load(LedgerPaths::in_dir(&config.data_dir)).await);
    let registry = Arc::new(InMemoryConnectionRegistry::new(Arc::new(Mutex::new(
        ConnectionTable::new(),
    ))));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
        HashMap::new(),
    ))));

    // 3. Create AppState
    let app_state = Arc::new(AppState::new(
        ledger,
        registry,
        message_pusher,
        clock.clone(),
    ));

    // 4. Spawn background tasks
    let scheduler = DailyResetScheduler::new(
        app_state.reset_donations_usecase.clone(),
        clock.clone(),
        config.reset_at,
    )
    .spawn();
    let reporter = config.status_interval.map(|interval| {
        ChannelStatusReporter::new(
            app_state.get_channel_status_usecase.clone(),
            clock.clone(),
            interval,
        )
        .spawn()
    });

    // 5. Run the server
    let result = Server::new(app_state)
        .run(&config.host, config.port, shutdown_signal())
        .await;

    scheduler.abort();
    if let Some(reporter) = reporter {
        reporter.abort();
    }

    if let Err(e) = result {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
