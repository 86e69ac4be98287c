//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories, external providers, and the GraphQL layer.

mod auth_service;
mod user_service;

pub use auth_service::{AuthService, LoginOutcome};
pub use user_service::UserService;

use crate::config::Settings;
use crate::error::AppResult;
use crate::external::oauth::OAuthRegistry;
use crate::models::Role;
use crate::repositories::Repositories;
use crate::utils::crypto::TokenCipher;

/// The authenticated caller, decoded from the access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i32,
    pub role: Role,
}

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Cloning is cheap since underlying pools use `Arc` internally.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub auth: AuthService,
}

impl Services {
    /// Creates a new Services instance from Repositories and settings.
    pub fn new(repos: Repositories, settings: &Settings) -> AppResult<Self> {
        let cipher = TokenCipher::from_base64_key(&settings.oauth.token_cipher_key)?;
        let providers = OAuthRegistry::new(&settings.oauth);

        Ok(Self {
            users: UserService::new(
                repos.users.clone(),
                repos.user_writer.clone(),
                settings.api_key.clone(),
            ),
            auth: AuthService::new(
                providers,
                cipher,
                settings.jwt.clone(),
                repos.users,
                repos.user_writer,
            ),
        })
    }
}
