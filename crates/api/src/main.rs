use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tablebook_api::auth::password::hash_password;
use tablebook_api::background::reservation_sweeper;
use tablebook_api::config::ServerConfig;
use tablebook_api::router::build_app_router;
use tablebook_api::state::AppState;
use tablebook_events::{LogSink, NotificationSink, ReservationNotifier};

/// Password shared by the seeded demo accounts.
const DEMO_PASSWORD: &str = "password123";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tablebook_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Store ---
    let pool = tablebook_db::create_pool();
    if config.seed_demo_data {
        let hash = hash_password(DEMO_PASSWORD).expect("Failed to hash demo password");
        let summary = tablebook_db::seed::seed_demo_data(&pool, &hash)
            .await
            .expect("Failed to seed demo data");
        tracing::info!(
            users = summary.users,
            restaurants = summary.restaurants,
            "Demo data loaded"
        );
    }

    // --- Event bus ---
    let event_bus = Arc::new(tablebook_events::EventBus::default());

    let sink: Arc<dyn NotificationSink> = Arc::new(LogSink);
    let notifier_handle = tokio::spawn(ReservationNotifier::run(sink, event_bus.subscribe()));

    // --- Sweeper ---
    let cancel = CancellationToken::new();
    let sweeper_handle = tokio::spawn(reservation_sweeper::run(
        pool.clone(),
        Arc::clone(&event_bus),
        config.booking.clone(),
        Duration::from_secs(config.sweep_interval_secs),
        cancel.clone(),
    ));

    tracing::info!("Background services started (notifier, reservation sweeper)");

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    let grace = Duration::from_secs(config.shutdown_timeout_secs);

    cancel.cancel();
    let _ = tokio::time::timeout(grace, sweeper_handle).await;
    tracing::info!("Reservation sweeper stopped");

    // Dropping the last sender closes the channel and ends the notifier.
    drop(event_bus);
    let _ = tokio::time::timeout(grace, notifier_handle).await;
    tracing::info!("Notifier stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
