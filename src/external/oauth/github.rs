use async_trait::async_trait;
use serde::Deserialize;

use super::provider::OAuthClient;
use crate::config::OAuthProviderConfig;
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;
use crate::models::Provider;

const AUTHORIZE_API: &str = "https://github.com/login/oauth/authorize";
const TOKEN_API: &str = "https://github.com/login/oauth/access_token";
const USER_API: &str = "https://api.github.com/user";

#[derive(Debug, Deserialize)]
struct GithubTokenResponse {
    access_token: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    id: u64,
}

pub struct GithubOAuth {
    config: OAuthProviderConfig,
}

impl GithubOAuth {
    pub fn new(config: OAuthProviderConfig) -> Self {
        Self { config }
    }

    fn make_error(message: impl Into<String>) -> AppError {
        AppError::OAuthProvider {
            message: format!("github: {}", message.into()),
        }
    }
}

#[async_trait]
impl OAuthClient for GithubOAuth {
    fn provider(&self) -> Provider {
        Provider::Github
    }

    fn authorize_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&scope=read:user&state={}",
            AUTHORIZE_API, self.config.client_id, self.config.redirect_uri, state
        )
    }

    async fn exchange_code(&self, code: &str) -> AppResult<String> {
        let resp = HTTP_CLIENT
            .post(TOKEN_API)
            .header("Accept", "application/json")
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Self::make_error(format!("token request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| Self::make_error(format!("token endpoint HTTP error: {}", e)))?;

        let token: GithubTokenResponse = resp
            .json()
            .await
            .map_err(|e| Self::make_error(format!("token response invalid JSON: {}", e)))?;

        token.access_token.ok_or_else(|| {
            Self::make_error(format!(
                "code exchange rejected: {}",
                token
                    .error_description
                    .unwrap_or_else(|| "no access token in response".to_string())
            ))
        })
    }

    async fn fetch_uid(&self, access_token: &str) -> AppResult<String> {
        let resp = HTTP_CLIENT
            .get(USER_API)
            .header("Accept", "application/vnd.github+json")
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| Self::make_error(format!("user request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| Self::make_error(format!("user endpoint HTTP error: {}", e)))?;

        let user: GithubUser = resp
            .json()
            .await
            .map_err(|e| Self::make_error(format!("user response invalid JSON: {}", e)))?;

        Ok(user.id.to_string())
    }
}
