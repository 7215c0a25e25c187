use std::sync::Arc;

use axum::http::{Method, header};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use scentenor_core::{Config, SessionContext};

mod routes;

/// Shared application state: the config and the single session's inventory
///
/// The tool is single-user; serializing interactions behind one mutex gives
/// the one-outstanding-request-at-a-time model the form assumes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session: Arc<Mutex<SessionContext>>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        "Starting Scentenor v{} on {}",
        env!("CARGO_PKG_VERSION"),
        config.bind_addr
    );

    let state = AppState {
        config: Arc::new(config.clone()),
        session: Arc::new(Mutex::new(SessionContext::new())),
    };

    // The front end is served separately during development, so allow it in
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let app = routes::router().with_state(state).layer(
        tower::ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
