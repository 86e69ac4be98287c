use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::Provider;

/// A third-party identity provider speaking the authorization-code flow.
///
/// Implementations only deal in strings: the code from the callback, the
/// provider access token, and the provider's stable account id.
#[async_trait]
pub trait OAuthClient: Send + Sync {
    fn provider(&self) -> Provider;

    /// Builds the URL the browser is sent to, carrying the CSRF state.
    fn authorize_url(&self, state: &str) -> String;

    /// Exchanges a callback code for the provider access token.
    async fn exchange_code(&self, code: &str) -> AppResult<String>;

    /// Fetches the provider's stable account id for an access token.
    async fn fetch_uid(&self, access_token: &str) -> AppResult<String>;
}
