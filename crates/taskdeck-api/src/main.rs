use std::net::SocketAddr;

use tracing::{info, warn};

use taskdeck_api::{build_router, config::ServerConfig, telemetry, AppState};
use taskdeck_db::{log_pool_metrics, Database, PoolConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env();
    let _log_guard = telemetry::init_tracing(&config.logging);

    info!(
        log_format = ?config.logging.format,
        log_file = config.logging.file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    if config.jwt_secret_generated {
        warn!("JWT_SECRET is not set; using a random secret, tokens will not survive a restart");
    }
    match &config.rate_limit {
        Some(limit) => info!(
            "Rate limiting: enabled ({} requests per {} seconds)",
            limit.requests,
            limit.period.as_secs()
        ),
        None => info!("Rate limiting: disabled"),
    }

    // Connect to database
    info!("Connecting to database...");
    let db = Database::connect_with_config(
        &config.database_url,
        PoolConfig::new().max_connections(config.db_max_connections),
    )
    .await?;
    info!("Database connected");

    // Run pending database migrations on startup
    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database migrations complete");
    log_pool_metrics(db.pool());

    let state = AppState::new(db, &config);
    let app = build_router(state, &config);

    // Start server
    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
