//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use axum::{Router, middleware, routing::get, routing::post};
use tower_http::cors::CorsLayer;

use crate::api::handlers::graphql::{graphql_handler, playground};
use crate::api::handlers::health::health_routes;
use crate::api::middleware::{auth_context_middleware, logging_middleware, request_id_middleware};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. Request ID middleware (runs first) - generates/propagates request IDs
/// 2. Logging middleware - logs requests with request IDs
/// 3. Auth context middleware - decodes the bearer token into an actor
///
/// # Routes
/// - `POST /query` - The GraphQL endpoint
/// - `GET /` - GraphQL playground
/// - `GET /health[/ready|/live]` - Health probes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(playground))
        .route("/query", post(graphql_handler))
        .merge(health_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_context_middleware,
        ))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
