//! Bookworm Server - REST API for the book catalogue and review service
//!
//! Wires configuration, the database pool, and the token service into the
//! application router and serves it.

use tracing_subscriber::EnvFilter;

use bookworm_server::{create_router_with_config, db, AppState, Config, TokenService};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bookworm_server=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();

    let pool = match db::connect(&config).await {
        Ok(pool) => {
            if let Err(e) = sqlx::migrate!().run(&pool).await {
                tracing::error!(error = %e, "Failed to run database migrations");
                std::process::exit(1);
            }
            tracing::info!("Connected to database");
            Some(pool)
        }
        Err(e) => {
            tracing::error!(error = %e, "Database unavailable, starting degraded");
            None
        }
    };

    let tokens = TokenService::new(&config.jwt_secret, config.jwt_expires_in_days);
    let state = AppState::new(pool, tokens);
    let app = create_router_with_config(&config, state);

    let addr = config.socket_addr();
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    axum::serve(listener, app).await.expect("Server error");
}
