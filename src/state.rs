//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use crate::config::{JwtConfig, Settings};
use crate::db::AsyncDbPool;
use crate::error::AppResult;
use crate::graphql::{AppSchema, build_schema};
use crate::repositories::Repositories;
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// This struct is designed to be used with Axum's State extractor.
/// Cloning is cheap since the schema and pool use Arc internally.
#[derive(Clone)]
pub struct AppState {
    /// The executable GraphQL schema with services injected
    pub schema: AppSchema,
    /// Repository facade, kept for startup tasks like cache warming
    pub repositories: Repositories,
    /// Direct access to the database connection pool
    pub db_pool: AsyncDbPool,
    /// JWT configuration for token validation in middleware
    pub jwt_config: JwtConfig,
}

impl AppState {
    /// Creates a new AppState from a database connection pool and settings.
    ///
    /// Initializes repositories, services, and the GraphQL schema.
    pub fn new(pool: AsyncDbPool, settings: &Settings) -> AppResult<Self> {
        let repositories = Repositories::new(pool.clone());
        let services = Services::new(repositories.clone(), settings)?;
        let schema = build_schema(services);

        Ok(Self {
            schema,
            repositories,
            db_pool: pool,
            jwt_config: settings.jwt.clone(),
        })
    }
}
