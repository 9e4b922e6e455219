use league_table_api::{config::Settings, db, routes};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting league table api...");

    let settings = Settings::from_env().expect("Invalid configuration");

    let pool = db::connect(&settings)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Database connection pool ready ({} max).", settings.db_max_connections);

    let addr = settings.addr();
    let app = routes::app(pool);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .expect("Failed to start server.");
}
