//! OAuth login, registration, and session issuance.
//!
//! Login is a two-step dance for new accounts: `login` with an unknown
//! identity hands back the provider access token encrypted, and `register`
//! takes that blob together with the profile to create the account. The
//! client never holds a usable provider token.

use rand::Rng;
use rand::distr::Alphanumeric;

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::external::oauth::OAuthRegistry;
use crate::models::{NewUserProfile, OAuthIdentity, Provider, User};
use crate::repositories::{UserReader, UserWriter};
use crate::utils::crypto::TokenCipher;
use crate::utils::jwt::{
    TokenPair, generate_state_token, generate_token_pair, validate_refresh_token,
    validate_state_token,
};

/// Length of the random nonce inside the CSRF state token.
const STATE_NONCE_LEN: usize = 32;

/// What `login` produced: a session for a known identity, or an encrypted
/// provider token to be passed to `register` for an unknown one.
#[derive(Debug)]
pub enum LoginOutcome {
    Session { user: User, tokens: TokenPair },
    Unregistered { encrypted_token: String },
}

#[derive(Clone)]
pub struct AuthService {
    providers: OAuthRegistry,
    cipher: TokenCipher,
    jwt: JwtConfig,
    reader: UserReader,
    writer: UserWriter,
}

impl AuthService {
    pub fn new(
        providers: OAuthRegistry,
        cipher: TokenCipher,
        jwt: JwtConfig,
        reader: UserReader,
        writer: UserWriter,
    ) -> Self {
        Self {
            providers,
            cipher,
            jwt,
            reader,
            writer,
        }
    }

    /// Builds the provider's authorize URL with a fresh CSRF state.
    ///
    /// The state is a short-lived signed token, so the callback can verify
    /// it was minted here without any server-side session storage.
    pub fn get_auth_redirect_link(&self, provider: Provider) -> AppResult<String> {
        let nonce: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(STATE_NONCE_LEN)
            .map(char::from)
            .collect();
        let state = generate_state_token(&nonce, &self.jwt.secret)?;
        Ok(self.providers.get(provider).authorize_url(&state))
    }

    /// Completes the OAuth callback.
    ///
    /// Verifies the state came from [`get_auth_redirect_link`] and is still
    /// fresh, then exchanges the code, resolves the provider uid, and either
    /// issues a session or hands back the encrypted provider token for
    /// `register`.
    pub async fn login(
        &self,
        provider: Provider,
        code: &str,
        state: &str,
    ) -> AppResult<LoginOutcome> {
        validate_state_token(state, &self.jwt.secret)?;

        let client = self.providers.get(provider);
        let access_token = client.exchange_code(code).await?;
        let uid = client.fetch_uid(&access_token).await?;

        match self.reader.find_by_oauth(provider, &uid).await? {
            Some(user) => {
                let tokens = generate_token_pair(user.id, user.role, &self.jwt)?;
                Ok(LoginOutcome::Session { user, tokens })
            }
            None => Ok(LoginOutcome::Unregistered {
                encrypted_token: self.cipher.encrypt(&access_token)?,
            }),
        }
    }

    /// Creates an account from a profile plus the encrypted token minted by
    /// [`login`](Self::login), then issues the first session.
    ///
    /// The uid is re-fetched from the provider rather than trusted from the
    /// client, so the blob can only register the identity it was minted for.
    pub async fn register(
        &self,
        provider: Provider,
        encrypted_token: &str,
        profile: NewUserProfile,
    ) -> AppResult<(User, TokenPair)> {
        let access_token = self.cipher.decrypt(encrypted_token)?;
        let uid = self.providers.get(provider).fetch_uid(&access_token).await?;

        let user = self
            .writer
            .create(profile, OAuthIdentity { provider, uid })
            .await?;
        let tokens = generate_token_pair(user.id, user.role, &self.jwt)?;
        Ok((user, tokens))
    }

    /// Trades a refresh token for a new token pair.
    ///
    /// The user is re-read so a deleted account cannot refresh and a role
    /// change takes effect on the next rotation.
    pub async fn refresh_jwt(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = validate_refresh_token(refresh_token, &self.jwt.secret)?;
        let user_id = claims.user_id()?;

        let user = match self.reader.get_by_id(user_id).await {
            Ok(user) => user,
            Err(AppError::NotFound { .. }) => {
                return Err(AppError::unauthorized("Account no longer exists"));
            }
            Err(e) => return Err(e),
        };

        generate_token_pair(user.id, user.role, &self.jwt)
    }
}
