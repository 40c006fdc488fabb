use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::AlumniService;

use crate::openapi::ApiDoc;

pub mod alumni;

#[derive(Clone)]
pub struct ServerState {
    pub alumni: Arc<AlumniService>,
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the application router. `upload_limit` caps the import request body.
pub fn build_router(state: ServerState, cors: CorsLayer, upload_limit: usize) -> Router {
    let alumni_routes = Router::new()
        .route(
            "/alumni",
            get(alumni::list).post(alumni::create).delete(alumni::delete_by_query),
        )
        .route("/alumni/check-email", get(alumni::check_email))
        .route("/alumni/chart", get(alumni::chart))
        .route(
            "/alumni/import",
            post(alumni::import).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/alumni/:id",
            get(alumni::detail).put(alumni::update).delete(alumni::delete_by_path),
        );

    Router::new()
        .route("/health", get(health))
        .merge(alumni_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx responses
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
