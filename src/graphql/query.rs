use async_graphql::{Context, ID, Object, Result};

use crate::graphql::types::{Jwt, LoginPayload, User, UsersConnection};
use crate::graphql::{gql_error, parse_user_id, require_actor};
use crate::models::Provider;
use crate::services::{LoginOutcome, Services};
use crate::utils::cursor::decode_cursor;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// A single user by id.
    async fn get_user(&self, ctx: &Context<'_>, id: ID) -> Result<User> {
        require_actor(ctx)?;
        let services = ctx.data_unchecked::<Services>();
        let user_id = parse_user_id(&id)?;

        services
            .users
            .get_user(user_id)
            .await
            .map(User::from)
            .map_err(gql_error)
    }

    /// Paginated user listing, admin only.
    async fn users(
        &self,
        ctx: &Context<'_>,
        first: i64,
        after: Option<String>,
    ) -> Result<UsersConnection> {
        let actor = require_actor(ctx)?;
        let services = ctx.data_unchecked::<Services>();

        let cursor = match after {
            Some(cursor) => Some(decode_cursor(&cursor).map_err(gql_error)?),
            None => None,
        };

        let page = services
            .users
            .list_users(&actor, first, cursor)
            .await
            .map_err(gql_error)?;
        Ok(UsersConnection::from_page(page, first))
    }

    /// Full-text search over user names, capped at ten results.
    async fn search_user(&self, ctx: &Context<'_>, name: String) -> Result<Vec<User>> {
        require_actor(ctx)?;
        let services = ctx.data_unchecked::<Services>();

        let users = services.users.search_users(&name).await.map_err(gql_error)?;
        Ok(users.into_iter().map(User::from).collect())
    }

    /// The caller's own profile.
    async fn me(&self, ctx: &Context<'_>) -> Result<User> {
        let actor = require_actor(ctx)?;
        let services = ctx.data_unchecked::<Services>();

        services
            .users
            .me(&actor)
            .await
            .map(User::from)
            .map_err(gql_error)
    }

    /// The provider's authorize URL to send the browser to. The embedded
    /// state must come back unchanged on `login`.
    async fn get_auth_redirect_link(&self, ctx: &Context<'_>, provider: Provider) -> Result<String> {
        let services = ctx.data_unchecked::<Services>();
        services
            .auth
            .get_auth_redirect_link(provider)
            .map_err(gql_error)
    }

    /// Completes the OAuth callback.
    ///
    /// `state` is the CSRF state from the authorize redirect; a missing or
    /// altered state fails before any provider call. For a registered
    /// identity this returns the user plus a token pair; for an unknown one
    /// it returns `encryptedOauthAccessToken` to be fed into `register`.
    async fn login(
        &self,
        ctx: &Context<'_>,
        provider: Provider,
        code: String,
        state: String,
    ) -> Result<LoginPayload> {
        let services = ctx.data_unchecked::<Services>();

        let outcome = services
            .auth
            .login(provider, &code, &state)
            .await
            .map_err(gql_error)?;

        Ok(match outcome {
            LoginOutcome::Session { user, tokens } => LoginPayload {
                account_exists: true,
                user: Some(User::from(user)),
                access_token: Some(tokens.access_token),
                refresh_token: Some(tokens.refresh_token),
                encrypted_oauth_access_token: None,
            },
            LoginOutcome::Unregistered { encrypted_token } => LoginPayload {
                account_exists: false,
                user: None,
                access_token: None,
                refresh_token: None,
                encrypted_oauth_access_token: Some(encrypted_token),
            },
        })
    }

    /// Trades a refresh token for a fresh token pair.
    async fn refresh_jwt(&self, ctx: &Context<'_>, refresh_token: String) -> Result<Jwt> {
        let services = ctx.data_unchecked::<Services>();

        let tokens = services
            .auth
            .refresh_jwt(&refresh_token)
            .await
            .map_err(gql_error)?;
        Ok(Jwt {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }
}
