use super::auth;
use super::handlers;
use super::state::AppState;
use crate::config::CorsConfig;
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Largest accepted request body (JSON or raw chunk)
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState, cors: &CorsConfig) -> Result<Router> {
    // Bearer token required
    let protected = Router::new()
        // Users & patients
        .route("/api/v1/patients", get(handlers::list_patients))
        .route("/api/users/asd3fd2faec", get(handlers::find_user_by_email))
        .route("/api/v1/add-patient-ext", post(handlers::add_patient))
        .route(
            "/api/v1/patient-details/:patient_id",
            get(handlers::patient_details),
        )
        // Sessions
        .route(
            "/api/v1/fetch-session-by-patient/:patient_id",
            get(handlers::sessions_by_patient),
        )
        .route("/api/v1/all-session", get(handlers::all_sessions))
        // Templates
        .route(
            "/api/v1/fetch-default-template-ext",
            get(handlers::default_templates),
        )
        // Recording / upload
        .route("/api/v1/upload-session", post(handlers::upload_session))
        .route("/api/v1/get-presigned-url", post(handlers::presigned_url))
        .route(
            "/api/v1/notify-chunk-uploaded",
            post(handlers::notify_chunk_uploaded),
        )
        .route_layer(middleware::from_fn(auth::require_token));

    let public = Router::new()
        // System
        .route("/health", get(handlers::health_check))
        .route("/api/docs", get(handlers::api_docs))
        // Presigned upload target
        .route(
            "/api/upload-chunk/:session_id/:chunk_number",
            put(handlers::upload_chunk),
        )
        // Debug
        .route("/api/debug/all-data", get(handlers::debug_all_data))
        .route(
            "/api/debug/chunks/:session_id",
            get(handlers::debug_chunks),
        );

    let router = public
        .merge(protected)
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(handlers::method_not_allowed_as_not_found))
        .layer(
            ServiceBuilder::new()
                // Add tracing middleware for request logging
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors)?)
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state);

    Ok(router)
}

/// "*" allows any origin; anything else is a single exact origin with credentials
fn cors_layer(cfg: &CorsConfig) -> Result<CorsLayer> {
    if cfg.allow_origin == "*" {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let origin = HeaderValue::from_str(&cfg.allow_origin)
        .with_context(|| format!("Invalid CORS origin: {}", cfg.allow_origin))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true))
}
