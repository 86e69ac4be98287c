//! GraphQL schema: query and mutation roots, object and input types,
//! and the mapping from application errors to GraphQL errors.

pub mod inputs;
mod mutation;
mod query;
pub mod types;

pub use mutation::MutationRoot;
pub use query::QueryRoot;

use async_graphql::{Context, EmptySubscription, ErrorExtensions, ID, Schema};

use crate::error::AppError;
use crate::services::{Actor, Services};

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the schema with the service layer injected as context data.
pub fn build_schema(services: Services) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(services)
        .finish()
}

/// Maps an application error onto a GraphQL error with a stable `code`
/// extension. Infrastructure failures are collapsed into a generic message
/// so driver details never reach the client; the full error has already
/// been logged where it occurred.
pub(crate) fn gql_error(error: AppError) -> async_graphql::Error {
    let code = match &error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Duplicate { .. } => "CONFLICT",
        AppError::Validation { .. } => "VALIDATION",
        AppError::Unauthorized { .. } => "UNAUTHORIZED",
        AppError::Forbidden { .. } => "FORBIDDEN",
        AppError::OAuthProvider { .. } => "OAUTH_PROVIDER",
        AppError::Database { .. }
        | AppError::Configuration { .. }
        | AppError::ConnectionPool { .. }
        | AppError::Internal { .. } => "INTERNAL",
    };

    let message = match &error {
        AppError::Database { .. }
        | AppError::Configuration { .. }
        | AppError::ConnectionPool { .. }
        | AppError::Internal { .. } => {
            tracing::error!(error = %error, "internal error in GraphQL operation");
            "Internal server error".to_string()
        }
        other => other.to_string(),
    };

    async_graphql::Error::new(message).extend_with(|_, ext| ext.set("code", code))
}

/// The authenticated caller, or an UNAUTHORIZED error.
pub(crate) fn require_actor(ctx: &Context<'_>) -> async_graphql::Result<Actor> {
    ctx.data_opt::<Actor>()
        .copied()
        .ok_or_else(|| gql_error(AppError::unauthorized("Missing or invalid access token")))
}

/// Parses a GraphQL ID back into the integer primary key.
pub(crate) fn parse_user_id(id: &ID) -> async_graphql::Result<i32> {
    id.parse::<i32>()
        .map_err(|_| gql_error(AppError::validation("id", "malformed user id")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infrastructure_errors_are_masked() {
        let error = gql_error(AppError::Internal {
            source: anyhow::anyhow!("connection refused at 10.0.0.5"),
        });
        assert_eq!(error.message, "Internal server error");
        assert!(!error.message.contains("10.0.0.5"));
    }

    #[test]
    fn domain_errors_keep_their_message() {
        let error = gql_error(AppError::not_found("users", "id", 7));
        assert!(error.message.contains("users"));
        assert!(error.message.contains("7"));
    }

    #[test]
    fn login_requires_the_oauth_state() {
        let sdl = Schema::build(QueryRoot, MutationRoot, EmptySubscription)
            .finish()
            .sdl();
        assert!(
            sdl.contains("login(provider: Provider!, code: String!, state: String!): LoginPayload!")
        );
    }

    #[test]
    fn malformed_id_is_a_validation_error() {
        assert!(parse_user_id(&ID("abc".to_string())).is_err());
        assert_eq!(parse_user_id(&ID("12".to_string())).unwrap(), 12);
    }
}
