//! The single GraphQL endpoint plus the playground page.

use async_graphql::http::{GraphQLPlaygroundConfig, playground_source};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::Extension;
use axum::extract::State;
use axum::response::{Html, IntoResponse};

use crate::api::middleware::AuthContext;
use crate::state::AppState;

/// Executes a GraphQL operation, handing the authenticated caller (if any)
/// to the resolvers as context data.
pub async fn graphql_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();
    if let Some(actor) = auth.0 {
        request = request.data(actor);
    }
    state.schema.execute(request).await.into()
}

/// Serves the GraphQL playground pointed at the query endpoint.
pub async fn playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new("/query")))
}
