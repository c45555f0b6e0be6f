#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use kitchen_api::auth::jwt::{generate_access_token, JwtConfig};
use kitchen_api::auth::password::hash_password;
use kitchen_api::config::{AdminAccount, ServerConfig, StoreBackend};
use kitchen_api::drafts::DraftRegistry;
use kitchen_api::routes;
use kitchen_api::state::AppState;
use kitchen_cloud::{CloudinaryConfig, CompressionSettings, MediaError, MediaHost, UploadFile};
use kitchen_core::search::SmartSearch;
use kitchen_core::store::memory::MemoryDocumentStore;
use kitchen_events::EventBus;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub const ADMIN_EMAIL: &str = "mona@example.com";
pub const ADMIN_PASSWORD: &str = "masala-chai-2024";
pub const UPLOADED_URL: &str = "https://res.cloudinary.com/demo/image/upload/v1/naan.jpg";

// ---------------------------------------------------------------------------
// Media host doubles
// ---------------------------------------------------------------------------

/// Accepts every upload and answers with [`UPLOADED_URL`].
#[derive(Default)]
pub struct StubMediaHost {
    pub uploads: Mutex<Vec<UploadFile>>,
}

#[async_trait]
impl MediaHost for StubMediaHost {
    async fn upload(&self, file: UploadFile) -> Result<String, MediaError> {
        if file.bytes.is_empty() {
            return Err(MediaError::EmptyFile);
        }
        self.uploads.lock().unwrap().push(file);
        Ok(UPLOADED_URL.to_string())
    }
}

/// Rejects every upload the way an unhappy media host would.
pub struct FailingMediaHost;

#[async_trait]
impl MediaHost for FailingMediaHost {
    async fn upload(&self, _file: UploadFile) -> Result<String, MediaError> {
        Err(MediaError::HttpStatus {
            status: 400,
            body: "Upload preset must be whitelisted for unsigned uploads".into(),
        })
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 1,
        upload_max_bytes: 1024 * 1024,
        document_store: StoreBackend::Memory,
        database_url: None,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
        admin: AdminAccount {
            email: ADMIN_EMAIL.to_string(),
            password_hash: hash_password(ADMIN_PASSWORD).expect("hashing should succeed"),
        },
        cloudinary: CloudinaryConfig {
            cloud_name: None,
            upload_preset: None,
            api_base: "http://127.0.0.1:9".to_string(),
        },
        compression: CompressionSettings::default(),
        llm: None,
        search_cache_ttl: Duration::from_secs(3600),
    }
}

/// Everything a test may want to poke at besides the router.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryDocumentStore>,
    pub media: Arc<StubMediaHost>,
    pub event_bus: Arc<EventBus>,
    pub shutdown: CancellationToken,
}

/// App over an empty in-memory store and a [`StubMediaHost`].
pub fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryDocumentStore::new());
    let media = Arc::new(StubMediaHost::default());
    let event_bus = Arc::new(EventBus::default());
    let shutdown = CancellationToken::new();
    let router = build_test_app(
        store.clone(),
        media.clone(),
        event_bus.clone(),
        shutdown.clone(),
    );
    TestApp {
        router,
        store,
        media,
        event_bus,
        shutdown,
    }
}

/// Build the full application router with all middleware layers.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack production uses.
pub fn build_test_app(
    store: Arc<MemoryDocumentStore>,
    media: Arc<dyn MediaHost>,
    event_bus: Arc<EventBus>,
    shutdown: CancellationToken,
) -> Router {
    let config = test_config();
    let upload_max_bytes = config.upload_max_bytes;

    let state = AppState {
        store,
        config: Arc::new(config),
        event_bus,
        media,
        search: Arc::new(SmartSearch::literal()),
        drafts: Arc::new(DraftRegistry::new()),
        shutdown,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:3001".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_routes(upload_max_bytes))
        .layer(CompressionLayer::new())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// A valid admin bearer token for the test config.
pub fn admin_token() -> String {
    let config = test_config();
    generate_access_token(ADMIN_EMAIL, "admin", &config.jwt).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::get(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, body, None).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::post(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send_json(app, Method::PATCH, uri, body, Some(token)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send_json(app, Method::PUT, uri, body, Some(token)).await
}

/// `POST /api/upload` with a single multipart field.
pub async fn upload(
    app: Router,
    token: &str,
    field: &str,
    file_name: &str,
    bytes: &[u8],
) -> Response {
    let boundary = "kitchen-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::post("/api/upload")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
