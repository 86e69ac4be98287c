//! JWT authentication middleware.
//!
//! Every operation rides through the single GraphQL endpoint, so auth is
//! optional at the HTTP layer: a valid bearer token puts an [`Actor`] into
//! the request extensions, anything else leaves it absent and the resolvers
//! decide whether that is acceptable.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::services::Actor;
use crate::state::AppState;
use crate::utils::jwt::{Claims, validate_access_token};

/// The authentication outcome for one request, always present in the
/// extensions once the middleware has run.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext(pub Option<Actor>);

fn actor_from_claims(claims: &Claims) -> Option<Actor> {
    let user_id = claims.user_id().ok()?;
    Some(Actor {
        user_id,
        role: claims.role,
    })
}

/// Decodes the Authorization header into an [`AuthContext`] extension.
///
/// Invalid or expired tokens are treated the same as no token; the
/// resolvers answer UNAUTHORIZED when the operation needs a caller.
pub async fn auth_context_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let mut actor = None;

    if let Some(auth_header) = request.headers().get(header::AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(claims) = validate_access_token(token, &state.jwt_config.secret)
    {
        actor = actor_from_claims(&claims);
    }

    request.extensions_mut().insert(AuthContext(actor));
    next.run(request).await
}
