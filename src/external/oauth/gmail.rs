use async_trait::async_trait;
use serde::Deserialize;

use super::provider::OAuthClient;
use crate::config::OAuthProviderConfig;
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;
use crate::models::Provider;

const AUTHORIZE_API: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_API: &str = "https://oauth2.googleapis.com/token";
const USERINFO_API: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    // Google's stable account id, distinct from the email.
    sub: String,
}

pub struct GmailOAuth {
    config: OAuthProviderConfig,
}

impl GmailOAuth {
    pub fn new(config: OAuthProviderConfig) -> Self {
        Self { config }
    }

    fn make_error(message: impl Into<String>) -> AppError {
        AppError::OAuthProvider {
            message: format!("gmail: {}", message.into()),
        }
    }
}

#[async_trait]
impl OAuthClient for GmailOAuth {
    fn provider(&self) -> Provider {
        Provider::Gmail
    }

    fn authorize_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope=openid%20email&state={}",
            AUTHORIZE_API, self.config.client_id, self.config.redirect_uri, state
        )
    }

    async fn exchange_code(&self, code: &str) -> AppResult<String> {
        let resp = HTTP_CLIENT
            .post(TOKEN_API)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| Self::make_error(format!("token request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| Self::make_error(format!("token endpoint HTTP error: {}", e)))?;

        let token: GoogleTokenResponse = resp
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
            .get(USERINFO_API)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| Self::make_error(format!("userinfo request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| Self::make_error(format!("userinfo endpoint HTTP error: {}", e)))?;

        let info: GoogleUserInfo = resp
            .json()
            .await
            .map_err(|e| Self::make_error(format!("userinfo response invalid JSON: {}", e)))?;

        Ok(info.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> GmailOAuth {
        GmailOAuth::new(OAuthProviderConfig {
            client_id: "cid".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "https://example.com/callback".to_string(),
        })
    }

    #[test]
    fn authorize_url_requests_code_flow() {
        let url = test_client().authorize_url("xyz");

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("state=xyz"));
        assert!(!url.contains("secret"));
    }

    #[test]
    fn provider_is_gmail() {
        assert_eq!(test_client().provider(), Provider::Gmail);
    }
}
