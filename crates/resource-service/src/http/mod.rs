//! HTTP surface.
//!
//! [`create_router`] assembles the route sets of all five resource kinds behind the caller
//! identification middleware, a request body limit and a trace layer.

pub mod auth;
pub mod error;
pub mod routes;

use axum::http::HeaderName;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::lifecycle::ResourceSystem;
use auth::{identify_caller, RoleHeader};
use routes::{book_routes, resource_routes};

/// Default request body size limit (1MB).
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Builds the application router over the handlers of `system`.
pub fn create_router(
    system: &ResourceSystem,
    role_header: HeaderName,
    body_limit: usize,
) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(resource_routes(system.bikes.clone()))
        .merge(resource_routes(system.cars.clone()))
        .merge(resource_routes(system.movies.clone()))
        .merge(resource_routes(system.books.clone()))
        .merge(resource_routes(system.restaurants.clone()))
        .merge(book_routes(system.books.clone()))
        .layer(middleware::from_fn_with_state(
            RoleHeader(role_header),
            identify_caller,
        ))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
}

/// Liveness probe. Needs no role.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
