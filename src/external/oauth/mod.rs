mod github;
mod gmail;
mod provider;

pub use github::GithubOAuth;
pub use gmail::GmailOAuth;
pub use provider::OAuthClient;

use std::sync::Arc;

use crate::config::OAuthConfig;
use crate::models::Provider;

/// Holds one client per supported provider, built from configuration.
#[derive(Clone)]
pub struct OAuthRegistry {
    github: Arc<GithubOAuth>,
    gmail: Arc<GmailOAuth>,
}

impl OAuthRegistry {
    pub fn new(config: &OAuthConfig) -> Self {
        Self {
            github: Arc::new(GithubOAuth::new(config.github.clone())),
            gmail: Arc::new(GmailOAuth::new(config.gmail.clone())),
        }
    }

    pub fn get(&self, provider: Provider) -> &dyn OAuthClient {
        match provider {
            Provider::Github => self.github.as_ref(),
            Provider::Gmail => self.gmail.as_ref(),
        }
    }
}
