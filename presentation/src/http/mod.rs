//! HTTP binding of the chat relay.
//!
//! | Method | Path           | Body                                   |
//! |--------|----------------|----------------------------------------|
//! | POST   | `/api/session` | `{"action": "create" \| "get", "id"?}` |
//! | POST   | `/api/chat`    | `{"sessionId", "query", "context", "messageContent"?}` |
//! | GET    | `/api/health`  |                                        |
//!
//! When a static directory is configured, every other path is served from it
//! with `index.html` as the fallback so client-side routes resolve.
//!
//! Images arrive inline as base64 data URLs, so API bodies may be far larger
//! than axum's 2 MB default. The limit comes from [`RouterOptions`].

pub mod dto;
pub mod error;
pub mod routes;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{Method, header};
use axum::routing::{any, get, post};
use relay_application::{ChatUseCase, ManageSessionUseCase};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatUseCase>,
    pub sessions: Arc<ManageSessionUseCase>,
}

impl AppState {
    pub fn new(chat: ChatUseCase, sessions: ManageSessionUseCase) -> Self {
        Self {
            chat: Arc::new(chat),
            sessions: Arc::new(sessions),
        }
    }
}

/// Request body limit for API routes (25 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Options for [`build_router`].
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Built frontend to serve for non-API paths
    pub static_dir: Option<PathBuf>,
    /// Largest accepted API request body in bytes
    pub max_body_bytes: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            static_dir: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl RouterOptions {
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }
}

/// Build the API router with CORS and request tracing.
pub fn build_router(state: AppState, options: RouterOptions) -> Router {
    let api = Router::new()
        .route("/api/session", post(routes::session_handler))
        .route("/api/chat", post(routes::chat_handler))
        .route("/api/health", get(routes::health_handler))
        .route("/api", any(routes::api_not_found))
        .route("/api/*rest", any(routes::api_not_found))
        .layer(DefaultBodyLimit::max(options.max_body_bytes))
        .with_state(state);

    let router = match options.static_dir.as_deref() {
        Some(dir) => api.fallback_service(spa_service(dir)),
        None => api,
    };

    router.layer(cors_layer()).layer(TraceLayer::new_for_http())
}

/// Static files with `index.html` for unknown paths.
fn spa_service(dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")))
}

/// Mirror the caller's origin so credentialed browser requests pass.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
