mod auth;
mod config;
mod db;
mod game;
mod models;
mod routes;
mod store;
mod utils;
mod websocket;

use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Router};
use config::{Config, StoreBackend};
use dashmap::DashMap;
use store::{GameStore, MemoryStore, PgStore};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn GameStore>,
    /// Registered players with an open game, keyed by player id, valued by connection id
    pub active_players: DashMap<i32, Uuid>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn GameStore>) -> Self {
        Self {
            config,
            store,
            active_players: DashMap::new(),
        }
    }
}

fn build_router(state: Arc<AppState>) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Serve frontend static files
    let frontend_service = ServeDir::new(&state.config.server.frontend_path);

    Router::new()
        // WebSocket endpoint
        .route("/ws", get(websocket::handle_websocket))
        // API routes
        .merge(routes::create_routes())
        .fallback_service(frontend_service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn open_store(config: &Config) -> Result<Arc<dyn GameStore>> {
    let default_timer = config.game.default_timer_duration;
    let store: Arc<dyn GameStore> = match config.game.store {
        StoreBackend::Postgres => {
            let pool = db::connect(&config.database).await?;
            Arc::new(PgStore::new(pool, default_timer))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; results are lost on restart");
            Arc::new(MemoryStore::new(default_timer))
        }
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "word_hunt_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Word Hunt backend server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        "Configuration loaded ({:?} store, {}x{} grid)",
        config.game.store,
        config.game.grid_size,
        config.game.grid_size
    );

    let store = open_store(&config).await?;
    store::seed_default_words(store.as_ref()).await?;

    let state = Arc::new(AppState::new(config.clone(), store));
    let app = build_router(state);

    // Start server
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("WebSocket endpoint: ws://{}/ws", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("Game frontend: http://{}/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
