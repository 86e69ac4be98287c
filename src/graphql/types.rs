//! GraphQL object types.
//!
//! `User` wraps the assembled domain user; satellite fields are resolved
//! lazily so a query that never asks for them costs no extra statements.

use async_graphql::{Context, ID, Object, Result, SimpleObject};
use chrono::NaiveDateTime;

use crate::graphql::gql_error;
use crate::models::{self, Provider, Race, Role, ShirtSize};
use crate::services::Services;
use crate::utils::cursor::encode_cursor;

pub struct User {
    inner: models::User,
}

impl From<models::User> for User {
    fn from(inner: models::User) -> Self {
        Self { inner }
    }
}

#[Object]
impl User {
    async fn id(&self) -> ID {
        ID(self.inner.id.to_string())
    }

    async fn first_name(&self) -> &str {
        &self.inner.first_name
    }

    async fn last_name(&self) -> &str {
        &self.inner.last_name
    }

    async fn full_name(&self) -> String {
        format!("{} {}", self.inner.first_name, self.inner.last_name)
    }

    async fn email(&self) -> &str {
        &self.inner.email
    }

    async fn phone_number(&self) -> &str {
        &self.inner.phone_number
    }

    async fn age(&self) -> Option<i32> {
        self.inner.age
    }

    async fn role(&self) -> Role {
        self.inner.role
    }

    async fn gender(&self) -> Option<&str> {
        self.inner.gender.as_deref()
    }

    async fn race(&self) -> Option<&Vec<Race>> {
        self.inner.race.as_ref()
    }

    async fn years_of_experience(&self) -> Option<f64> {
        self.inner.years_of_experience
    }

    async fn shirt_size(&self) -> Option<ShirtSize> {
        self.inner.shirt_size
    }

    async fn pronouns(&self) -> Option<Pronouns> {
        self.inner.pronouns.clone().map(Pronouns::from)
    }

    async fn oauth(&self) -> OAuth {
        OAuth::from(self.inner.oauth.clone())
    }

    async fn mailing_address(&self, ctx: &Context<'_>) -> Result<Option<MailingAddress>> {
        let services = ctx.data_unchecked::<Services>();
        services
            .users
            .mailing_address(self.inner.id)
            .await
            .map(|row| row.map(MailingAddress::from))
            .map_err(gql_error)
    }

    async fn mlh_terms(&self, ctx: &Context<'_>) -> Result<Option<MlhTerms>> {
        let services = ctx.data_unchecked::<Services>();
        services
            .users
            .mlh_terms(self.inner.id)
            .await
            .map(|row| row.map(MlhTerms::from))
            .map_err(gql_error)
    }

    async fn education_info(&self, ctx: &Context<'_>) -> Result<Option<EducationInfo>> {
        let services = ctx.data_unchecked::<Services>();
        services
            .users
            .education_info(self.inner.id)
            .await
            .map(|row| row.map(EducationInfo::from))
            .map_err(gql_error)
    }

    async fn api_key(&self, ctx: &Context<'_>) -> Result<Option<ApiKey>> {
        let services = ctx.data_unchecked::<Services>();
        services
            .users
            .api_key(self.inner.id)
            .await
            .map(|row| row.map(ApiKey::from))
            .map_err(gql_error)
    }
}

impl User {
    pub(crate) fn row_id(&self) -> i32 {
        self.inner.id
    }
}

/// The third-party identity a user signed up with.
#[derive(SimpleObject)]
#[graphql(name = "OAuth")]
pub struct OAuth {
    pub provider: Provider,
    pub uid: String,
}

impl From<models::OAuthIdentity> for OAuth {
    fn from(identity: models::OAuthIdentity) -> Self {
        Self {
            provider: identity.provider,
            uid: identity.uid,
        }
    }
}

#[derive(SimpleObject)]
pub struct Pronouns {
    pub subjective: String,
    pub objective: String,
}

impl From<models::Pronouns> for Pronouns {
    fn from(p: models::Pronouns) -> Self {
        Self {
            subjective: p.subjective,
            objective: p.objective,
        }
    }
}

#[derive(SimpleObject)]
pub struct MailingAddress {
    pub country: String,
    pub state: String,
    pub city: String,
    pub postal_code: String,
    pub address_lines: Vec<String>,
}

impl From<models::MailingAddress> for MailingAddress {
    fn from(row: models::MailingAddress) -> Self {
        Self {
            country: row.country,
            state: row.state,
            city: row.city,
            postal_code: row.postal_code,
            address_lines: row.address_lines,
        }
    }
}

#[derive(SimpleObject)]
pub struct MlhTerms {
    pub send_messages: bool,
    pub share_info: bool,
    pub code_of_conduct: bool,
}

impl From<models::MlhTerms> for MlhTerms {
    fn from(row: models::MlhTerms) -> Self {
        Self {
            send_messages: row.send_messages,
            share_info: row.share_info,
            code_of_conduct: row.code_of_conduct,
        }
    }
}

#[derive(SimpleObject)]
pub struct EducationInfo {
    pub name: String,
    pub major: String,
    pub graduation_date: NaiveDateTime,
    pub level: Option<String>,
}

impl From<crate::models::EducationInfoRow> for EducationInfo {
    fn from(row: crate::models::EducationInfoRow) -> Self {
        Self {
            name: row.name,
            major: row.major,
            graduation_date: row.graduation_date,
            level: row.level,
        }
    }
}

#[derive(SimpleObject)]
pub struct ApiKey {
    pub key: String,
    pub created: NaiveDateTime,
}

impl From<crate::models::ApiKeyRow> for ApiKey {
    fn from(row: crate::models::ApiKeyRow) -> Self {
        Self {
            key: row.key,
            created: row.created,
        }
    }
}

#[derive(SimpleObject)]
pub struct PageInfo {
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

#[derive(SimpleObject)]
pub struct UsersConnection {
    pub total_count: i64,
    pub page_info: PageInfo,
    pub users: Vec<User>,
}

impl UsersConnection {
    /// Builds the connection from a fetched page. The page is full exactly
    /// when another page may exist.
    pub(crate) fn from_page(page: crate::repositories::UserPage, first: i64) -> Self {
        let users: Vec<User> = page.users.into_iter().map(User::from).collect();
        let has_next_page = users.len() as i64 == first && first > 0;

        Self {
            total_count: page.total,
            page_info: PageInfo {
                start_cursor: users.first().map(|u| encode_cursor(u.row_id())),
                end_cursor: users.last().map(|u| encode_cursor(u.row_id())),
                has_next_page,
            },
            users,
        }
    }
}

/// Result of the `login` query.
///
/// `accountExists` splits the two outcomes: a session for a registered
/// identity, or `encryptedOauthAccessToken` to be passed to `register`.
#[derive(SimpleObject)]
pub struct LoginPayload {
    pub account_exists: bool,
    pub user: Option<User>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub encrypted_oauth_access_token: Option<String>,
}

#[derive(SimpleObject)]
pub struct RegistrationPayload {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(SimpleObject)]
pub struct Jwt {
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::{MutationRoot, QueryRoot};
    use crate::models::OAuthIdentity;
    use async_graphql::{EmptySubscription, Schema};

    #[test]
    fn oauth_object_carries_provider_and_uid() {
        let identity = OAuthIdentity {
            provider: Provider::Github,
            uid: "gh-42".to_string(),
        };

        let oauth = OAuth::from(identity);
        assert_eq!(oauth.provider, Provider::Github);
        assert_eq!(oauth.uid, "gh-42");
    }

    #[test]
    fn user_exposes_oauth_identity_object() {
        let sdl = Schema::build(QueryRoot, MutationRoot, EmptySubscription)
            .finish()
            .sdl();

        assert!(sdl.contains("oauth: OAuth!"));
        assert!(sdl.contains("type OAuth"));
    }
}
