//! BookCycle Identity Server binary.

use std::net::SocketAddr;

use account_store::{MemoryAccountStore, PostgresAccountStore};
use identity_server::{config::Config, create_app, create_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    tracing::info!(
        issuer = %config.keycloak_issuer_url,
        "Starting BookCycle Identity Server"
    );

    // Parse server address
    let addr: SocketAddr = config.server_addr().parse()?;

    match config.database_url.clone() {
        Some(database_url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(10)
                .connect(&database_url)
                .await?;

            let store = PostgresAccountStore::new(pool);
            store.init().await?;
            let state = create_state(config, store)?;
            let app = create_app(state);

            serve(addr, app).await
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory account store");

            let store = MemoryAccountStore::new();
            let state = create_state(config, store)?;
            let app = create_app(state);

            serve(addr, app).await
        }
    }
}

async fn serve(addr: SocketAddr, app: axum::Router) -> anyhow::Result<()> {
    tracing::info!(addr = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
