use async_graphql::{Context, ID, Object, Result};

use crate::graphql::inputs::{NewUserInput, UserPatchInput};
use crate::graphql::types::{ApiKey, RegistrationPayload, User};
use crate::graphql::{gql_error, parse_user_id, require_actor};
use crate::models::Provider;
use crate::services::Services;

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Creates an account from the profile plus the encrypted provider
    /// token handed out by the `login` query, and issues the first session.
    async fn register(
        &self,
        ctx: &Context<'_>,
        provider: Provider,
        encrypted_oauth_access_token: String,
        input: NewUserInput,
    ) -> Result<RegistrationPayload> {
        let services = ctx.data_unchecked::<Services>();

        let (user, tokens) = services
            .auth
            .register(provider, &encrypted_oauth_access_token, input.into())
            .await
            .map_err(gql_error)?;

        Ok(RegistrationPayload {
            user: User::from(user),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }

    /// Applies a partial profile update in one transaction.
    async fn update_user(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UserPatchInput,
    ) -> Result<User> {
        let actor = require_actor(ctx)?;
        let services = ctx.data_unchecked::<Services>();
        let user_id = parse_user_id(&id)?;

        services
            .users
            .update_user(&actor, user_id, input.into())
            .await
            .map(User::from)
            .map_err(gql_error)
    }

    /// Deletes a user together with every satellite record.
    async fn delete_user(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let actor = require_actor(ctx)?;
        let services = ctx.data_unchecked::<Services>();
        let user_id = parse_user_id(&id)?;

        services
            .users
            .delete_user(&actor, user_id)
            .await
            .map(|()| true)
            .map_err(gql_error)
    }

    /// Issues a fresh API key, replacing any previous one.
    async fn add_api_key(&self, ctx: &Context<'_>, user_id: ID) -> Result<ApiKey> {
        let actor = require_actor(ctx)?;
        let services = ctx.data_unchecked::<Services>();
        let user_id = parse_user_id(&user_id)?;

        services
            .users
            .add_api_key(&actor, user_id)
            .await
            .map(ApiKey::from)
            .map_err(gql_error)
    }

    /// Revokes a user's API key.
    async fn delete_api_key(&self, ctx: &Context<'_>, user_id: ID) -> Result<bool> {
        let actor = require_actor(ctx)?;
        let services = ctx.data_unchecked::<Services>();
        let user_id = parse_user_id(&user_id)?;

        services
            .users
            .delete_api_key(&actor, user_id)
            .await
            .map(|()| true)
            .map_err(gql_error)
    }
}
