use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::models::Role;

/// Token type enumeration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token for API authentication (short-lived)
    Access,
    /// Refresh token for obtaining new access tokens (long-lived)
    Refresh,
}

/// JWT Claims structure containing user information and token metadata
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Role the user held when the token was issued
    pub role: Role,
    /// Token type (access or refresh)
    pub token_type: TokenType,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: i32, role: Role, token_type: TokenType, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        Self {
            sub: user_id.to_string(),
            role,
            token_type,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Parses the subject back into the user id it was issued for.
    pub fn user_id(&self) -> AppResult<i32> {
        self.sub.parse().map_err(|_| AppError::Unauthorized {
            message: "Malformed token subject".to_string(),
        })
    }
}

/// An access/refresh token pair issued at login or refresh.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs a token of the given type for a user.
pub fn generate_token(
    user_id: i32,
    role: Role,
    token_type: TokenType,
    secret: &str,
    expiration_hours: i64,
) -> AppResult<String> {
    let claims = Claims::new(user_id, role, token_type, expiration_hours);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
    })
}

/// Issues both tokens of a session using the configured lifetimes.
pub fn generate_token_pair(user_id: i32, role: Role, config: &JwtConfig) -> AppResult<TokenPair> {
    let access_token = generate_token(
        user_id,
        role,
        TokenType::Access,
        &config.secret,
        config.access_token_expiration,
    )?;
    let refresh_token = generate_token(
        user_id,
        role,
        TokenType::Refresh,
        &config.secret,
        config.refresh_token_expiration,
    )?;

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Validates and decodes a JWT token
///
/// # Arguments
/// * `token` - The JWT token string to validate
/// * `secret` - The secret key for verifying the token
/// * `expected_type` - Optional expected token type to validate against
pub fn validate_token(
    token: &str,
    secret: &str,
    expected_type: Option<TokenType>,
) -> AppResult<Claims> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::Unauthorized {
            message: "Token has expired".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidToken => AppError::Unauthorized {
            message: "Invalid token".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::Unauthorized {
            message: "Invalid token signature".to_string(),
        },
        _ => AppError::Unauthorized {
            message: format!("Token validation failed: {}", e),
        },
    })?;

    if let Some(expected) = expected_type
        && claims.token_type != expected
    {
        return Err(AppError::Unauthorized {
            message: format!(
                "Invalid token type: expected {:?}, got {:?}",
                expected, claims.token_type
            ),
        });
    }

    Ok(claims)
}

/// Lifetime of the OAuth state token in minutes. The window only has to
/// cover the redirect round-trip through the provider.
const STATE_TOKEN_MINUTES: i64 = 10;

/// Claims for the CSRF state carried through the OAuth redirect.
///
/// Minted before any account is known, so there is no subject; the nonce
/// makes each authorize URL unique.
#[derive(Debug, Serialize, Deserialize)]
pub struct StateClaims {
    pub nonce: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs a short-lived state token for the authorize redirect.
pub fn generate_state_token(nonce: &str, secret: &str) -> AppResult<String> {
    let now = Utc::now();
    let claims = StateClaims {
        nonce: nonce.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(STATE_TOKEN_MINUTES)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to generate state token: {}", e),
    })
}

/// Verifies the state handed back on the OAuth callback.
///
/// A session token is not a valid state: it decodes but lacks the nonce
/// claim, so it fails here like any other forgery.
pub fn validate_state_token(token: &str, secret: &str) -> AppResult<()> {
    decode::<StateClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|_| ())
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::Unauthorized {
            message: "OAuth state has expired".to_string(),
        },
        _ => AppError::Unauthorized {
            message: "Invalid OAuth state".to_string(),
        },
    })
}

/// Validates an access token.
pub fn validate_access_token(token: &str, secret: &str) -> AppResult<Claims> {
    validate_token(token, secret, Some(TokenType::Access))
}

/// Validates a refresh token.
pub fn validate_refresh_token(token: &str, secret: &str) -> AppResult<Claims> {
    validate_token(token, secret, Some(TokenType::Refresh))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test_secret_key_for_jwt_testing";

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: TEST_SECRET.to_string(),
            access_token_expiration: 1,
            refresh_token_expiration: 168,
        }
    }

    #[test]
    fn test_generate_token() {
        let token = generate_token(1, Role::Normal, TokenType::Access, TEST_SECRET, 24);

        assert!(token.is_ok());
        let token_str = token.unwrap();
        assert!(!token_str.is_empty());
        assert!(token_str.contains('.'));
    }

    #[test]
    fn test_generate_token_pair() {
        let result = generate_token_pair(1, Role::Admin, &test_config());

        assert!(result.is_ok());
        let pair = result.unwrap();
        assert!(!pair.access_token.is_empty());
        assert!(!pair.refresh_token.is_empty());
        assert_ne!(pair.access_token, pair.refresh_token);
    }

    #[test]
    fn test_validate_token_success() {
        let token = generate_token(1, Role::Normal, TokenType::Access, TEST_SECRET, 24).unwrap();

        let claims = validate_token(&token, TEST_SECRET, None);
        assert!(claims.is_ok());

        let claims = claims.unwrap();
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.user_id().unwrap(), 1);
        assert_eq!(claims.role, Role::Normal);
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn test_validate_refresh_token() {
        let pair = generate_token_pair(1, Role::Normal, &test_config()).unwrap();

        let claims = validate_refresh_token(&pair.refresh_token, TEST_SECRET);
        assert!(claims.is_ok());
        assert_eq!(claims.unwrap().token_type, TokenType::Refresh);
    }

    #[test]
    fn test_validate_wrong_token_type() {
        let pair = generate_token_pair(1, Role::Normal, &test_config()).unwrap();

        // Try to validate access token as refresh token
        let result = validate_refresh_token(&pair.access_token, TEST_SECRET);
        assert!(result.is_err());

        if let Err(AppError::Unauthorized { message }) = result {
            assert!(message.contains("Invalid token type"));
        } else {
            panic!("Expected Unauthorized error for wrong token type");
        }
    }

    #[test]
    fn test_validate_token_invalid_secret() {
        let token = generate_token(1, Role::Normal, TokenType::Access, TEST_SECRET, 24).unwrap();

        let result = validate_token(&token, "wrong_secret", None);
        assert!(result.is_err());

        if let Err(AppError::Unauthorized { message }) = result {
            assert!(message.contains("signature"));
        } else {
            panic!("Expected Unauthorized error");
        }
    }

    #[test]
    fn test_validate_token_invalid_format() {
        let result = validate_token("invalid.token.format", TEST_SECRET, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token() {
        let token = generate_token(1, Role::Normal, TokenType::Access, TEST_SECRET, -1).unwrap();

        let result = validate_token(&token, TEST_SECRET, None);
        assert!(result.is_err());

        if let Err(AppError::Unauthorized { message }) = result {
            assert!(message.contains("expired"));
        } else {
            panic!("Expected Unauthorized error for expired token");
        }
    }

    #[test]
    fn test_claims_structure() {
        let claims = Claims::new(42, Role::Admin, TokenType::Refresh, 24);

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.token_type, TokenType::Refresh);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_state_token_round_trip() {
        let token = generate_state_token("abc123", TEST_SECRET).unwrap();
        assert!(validate_state_token(&token, TEST_SECRET).is_ok());
    }

    #[test]
    fn test_state_token_wrong_secret() {
        let token = generate_state_token("abc123", TEST_SECRET).unwrap();

        let result = validate_state_token(&token, "wrong_secret");
        if let Err(AppError::Unauthorized { message }) = result {
            assert_eq!(message, "Invalid OAuth state");
        } else {
            panic!("Expected Unauthorized error for tampered state");
        }
    }

    #[test]
    fn test_state_token_expired() {
        // Built by hand so the exp lands outside the validation leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = StateClaims {
            nonce: "abc123".to_string(),
            iat: now - 900,
            exp: now - 300,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        let result = validate_state_token(&token, TEST_SECRET);
        if let Err(AppError::Unauthorized { message }) = result {
            assert!(message.contains("expired"));
        } else {
            panic!("Expected Unauthorized error for expired state");
        }
    }

    #[test]
    fn test_state_token_rejects_session_tokens() {
        // An access token signed with the same secret must not pass as
        // state: it carries no nonce claim.
        let token = generate_token(1, Role::Normal, TokenType::Access, TEST_SECRET, 24).unwrap();
        assert!(validate_state_token(&token, TEST_SECRET).is_err());
    }

    #[test]
    fn test_token_type_serialization() {
        let access_claims = Claims::new(1, Role::Normal, TokenType::Access, 1);
        let json = serde_json::to_string(&access_claims).unwrap();
        assert!(json.contains("\"token_type\":\"access\""));

        let refresh_claims = Claims::new(1, Role::Normal, TokenType::Refresh, 168);
        let json = serde_json::to_string(&refresh_claims).unwrap();
        assert!(json.contains("\"token_type\":\"refresh\""));
    }
}
