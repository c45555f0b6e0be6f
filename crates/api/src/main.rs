use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use kitchen_cloud::{CloudinaryHost, CompressingHost, LlmTransliterator, MediaHost};
use kitchen_core::cache::{TtlCache, DEFAULT_MAX_ENTRIES};
use kitchen_core::content::hero;
use kitchen_core::search::{QueryExpander, SmartSearch};
use kitchen_core::store::memory::MemoryDocumentStore;
use kitchen_core::store::DocumentStore;
use tokio_util::sync::CancellationToken;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kitchen_api::config::{ServerConfig, StoreBackend};
use kitchen_api::drafts::DraftRegistry;
use kitchen_api::routes;
use kitchen_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kitchen_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        store = ?config.document_store,
        "Loaded server configuration"
    );

    // --- Document store ---
    let store = connect_store(&config).await;

    // Fill canonical hero keys from the legacy ones, outside the request path.
    match hero::migrate_legacy_keys(store.as_ref()).await {
        Ok(true) => tracing::info!("Migrated legacy hero keys"),
        Ok(false) => tracing::debug!("Hero keys already canonical"),
        Err(e) => tracing::warn!(error = %e, "Hero key migration skipped"),
    }

    // --- CORS ---
    let cors = build_cors_layer(&config);

    // --- Media host ---
    let media: Arc<dyn MediaHost> = Arc::new(CompressingHost::new(
        CloudinaryHost::new(config.cloudinary.clone()),
        config.compression,
    ));
    if config.cloudinary.cloud_name.is_none() {
        tracing::warn!("CLOUDINARY_CLOUD_NAME is unset, uploads will fail");
    }

    // --- Smart search ---
    let expander = config.llm.clone().map(|llm| {
        tracing::info!(model = %llm.model, "Search-term expansion enabled");
        let expander: Arc<dyn QueryExpander> = Arc::new(LlmTransliterator::new(llm));
        expander
    });
    let search = Arc::new(SmartSearch::new(
        expander,
        TtlCache::new(config.search_cache_ttl, DEFAULT_MAX_ENTRIES),
    ));

    // --- Event bus ---
    let event_bus = Arc::new(kitchen_events::EventBus::default());
    let logger_handle = tokio::spawn(kitchen_events::EventLogger::run(event_bus.subscribe()));
    tracing::info!("Event bus created");

    // --- Shutdown token, cancelled on SIGINT/SIGTERM ---
    let shutdown = CancellationToken::new();

    // --- App state ---
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
        media,
        search,
        drafts: Arc::new(DraftRegistry::new()),
        shutdown: shutdown.clone(),
    };

    // --- Request ID header name ---
    let request_id_header = HeaderName::from_static("x-request-id");

    // --- Router ---
    let app = Router::new()
        // Health check at root level (not under /api).
        .merge(routes::health::router())
        .nest("/api", routes::api_routes(config.upload_max_bytes))
        // -- Middleware stack (applied bottom-up) --
        // Gzip bodies for clients that accept it; event streams pass through.
        .layer(CompressionLayer::new())
        // Panic recovery: catch panics and return 500.
        .layer(CatchPanicLayer::new())
        // Request timeout.
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        // Propagate request ID to response.
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        // Structured request/response tracing.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Set request ID on incoming requests.
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        // CORS.
        .layer(cors)
        // Shared state.
        .with_state(state);

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
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Dropping the last sender closes the channel and stops the logger.
    drop(event_bus);
    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    match tokio::time::timeout(grace, logger_handle).await {
        Ok(Ok(logged)) => tracing::info!(logged, "Event logger stopped"),
        _ => tracing::warn!("Event logger did not stop in time"),
    }

    tracing::info!("Graceful shutdown complete");
}

/// Open the configured document store.
///
/// Panics when Postgres is unreachable or migrations fail; the server is
/// useless without its content.
async fn connect_store(config: &ServerConfig) -> Arc<dyn DocumentStore> {
    match config.document_store {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory document store, content is lost on restart");
            Arc::new(MemoryDocumentStore::new())
        }
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .expect("DATABASE_URL must be set");

            let pool = kitchen_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            kitchen_db::health_check(&pool)
                .await
                .expect("Database health check failed");

            kitchen_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(kitchen_db::PgDocumentStore::new(pool))
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix). Cancels `shutdown`
/// so open theme streams finish and the server can drain.
async fn shutdown_signal(shutdown: CancellationToken) {
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

    shutdown.cancel();
}

/// Build the CORS middleware layer from server configuration.
///
/// Panics at startup if any configured origin is invalid.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
