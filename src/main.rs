//! Patrol Desk Server
//!
//! REST API server for patrol units and their status workflow.

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use patrol_desk_server::{
    api,
    config::{AppConfig, LoggingConfig, StorageBackend},
    repository::{MemoryStore, OfficerDirectory, PatrolStore, Repository},
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    init_tracing(&config.logging);

    tracing::info!("Starting Patrol Desk Server v{}", env!("CARGO_PKG_VERSION"));

    let (store, directory): (Arc<dyn PatrolStore>, Arc<dyn OfficerDirectory>) =
        match config.database.backend {
            StorageBackend::Postgres => {
                let pool = PgPoolOptions::new()
                    .max_connections(config.database.max_connections)
                    .min_connections(config.database.min_connections)
                    .connect(&config.database.url)
                    .await?;
                tracing::info!("Connected to database");

                sqlx::migrate!("./migrations").run(&pool).await?;
                tracing::info!("Database migrations completed");

                let repository = Repository::new(pool);
                (Arc::new(repository.clone()), Arc::new(repository))
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory store; data is lost on shutdown");
                let store = MemoryStore::new();
                (Arc::new(store.clone()), Arc::new(store))
            }
        };

    tracing::info!(
        "Patrol creation policy: {:?}",
        config.patrols.creation_policy
    );

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let services = Services::new(store, directory, config.patrols.clone());
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("patrol_desk_server={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api::routes(state))
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
