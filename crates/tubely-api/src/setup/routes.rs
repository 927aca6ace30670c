//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::auth::middleware::{auth_middleware, AuthState};
use crate::error::expose_error_details;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tubely_core::Config;
use utoipa::OpenApi;

/// Headroom on top of the video size limit for multipart boundaries and part headers
const MULTIPART_ENVELOPE_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub async fn setup_routes(
    config: &Config,
    state: Arc<AppState>,
) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AuthState {
        jwt: state.jwt.clone(),
    });
    let body_limit = config
        .max_video_size_bytes()
        .saturating_add(MULTIPART_ENVELOPE_BYTES);

    let protected_routes = protected_routes(body_limit, config.max_concurrent_uploads())
        .layer(axum::middleware::from_fn_with_state(auth_state, auth_middleware));

    let mut app = public_routes()
        .merge(protected_routes)
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(RequestBodyLimitLayer::new(body_limit));

    let error_details = !config.is_production();
    if error_details {
        app = app.layer(axum::middleware::from_fn(expose_error_details));
    }

    let app = app
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!(
        body_limit_bytes = body_limit,
        max_concurrent_uploads = config.max_concurrent_uploads(),
        error_details,
        "Routes configured"
    );
    Ok(app)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::liveness_check))
        .route("/api/openapi.json", get(openapi_json))
}

fn protected_routes(body_limit: usize, max_concurrent_uploads: usize) -> Router<Arc<AppState>> {
    // Excess uploads wait for a slot instead of spawning more media tool processes
    let upload = post(handlers::video_upload::upload_video)
        .layer::<_, std::convert::Infallible>(DefaultBodyLimit::max(body_limit))
        .layer(ConcurrencyLimitLayer::new(max_concurrent_uploads));

    Router::new()
        .route("/api/video_upload/{video_id}", upload)
        .route("/api/videos/{video_id}", get(handlers::video_get::get_video))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any));
    }

    let origins = config
        .cors_origins()
        .iter()
        .map(|o| o.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(Any))
}
