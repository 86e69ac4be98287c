//! HTTP API layer.
//!
//! Axum routes, middleware, and the GraphQL endpoint handlers.

pub mod handlers;
pub mod middleware;
pub mod routes;
