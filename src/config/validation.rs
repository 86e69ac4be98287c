//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;

use crate::config::error::ConfigError;
use crate::config::settings::{
    DatabaseConfig, LoggerSettings, OAuthConfig, ServerConfig, Settings,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Request timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// Validate database configuration
    ///
    /// # Validation Rules
    /// - URL must not be empty and must be a PostgreSQL URL
    /// - Max connections must be greater than 0
    /// - Min connections must be greater than 0 and not exceed max
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::validation(
                "database.url",
                "Database URL is required. Please specify a valid database connection string.",
            ));
        }

        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ConfigError::validation(
                "database.url",
                "Invalid database URL format. Expected format: postgres://[user:password@]host[:port]/database",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections == 0 {
            return Err(ConfigError::validation(
                "database.min_connections",
                "Min connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::ValidationError {
                field: "database.min_connections".to_string(),
                message: format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            });
        }

        Ok(())
    }
}

impl OAuthConfig {
    /// Validate OAuth configuration
    ///
    /// # Validation Rules
    /// - Token cipher key must be base64 that decodes to exactly 32 bytes
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_cipher_key.is_empty() {
            return Err(ConfigError::validation(
                "oauth.token_cipher_key",
                "Token cipher key is required. Provide a base64-encoded 32-byte key.",
            ));
        }

        let decoded = STANDARD_NO_PAD
            .decode(self.token_cipher_key.trim_end_matches('='))
            .map_err(|e| {
                ConfigError::ValidationError {
                    field: "oauth.token_cipher_key".to_string(),
                    message: format!("Token cipher key is not valid base64: {}", e),
                }
            })?;

        if decoded.len() != 32 {
            return Err(ConfigError::ValidationError {
                field: "oauth.token_cipher_key".to_string(),
                message: format!(
                    "Token cipher key must decode to 32 bytes, got {} bytes.",
                    decoded.len()
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        if self.file.enabled && self.file.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.file.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.file.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// This method validates all sub-configurations and returns the first
    /// validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.jwt.validate()?;
        self.oauth.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::{FileSettings, JwtConfig};

    fn valid_cipher_key() -> String {
        // 32 bytes of zeroes, base64
        base64::engine::general_purpose::STANDARD_NO_PAD.encode([0u8; 32])
    }

    fn valid_settings() -> Settings {
        Settings {
            database: DatabaseConfig {
                url: "postgres://localhost/test".to_string(),
                ..Default::default()
            },
            jwt: JwtConfig {
                secret: "a".repeat(32),
                ..Default::default()
            },
            oauth: OAuthConfig {
                token_cipher_key: valid_cipher_key(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_server_config_invalid_port_zero() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationError { field, .. } if field == "server.port")
        );
    }

    #[test]
    fn test_database_config_empty_url() {
        let config = DatabaseConfig::default();
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationError { field, .. } if field == "database.url")
        );
    }

    #[test]
    fn test_database_config_invalid_url_format() {
        let config = DatabaseConfig {
            url: "mysql://localhost/db".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationError { field, .. } if field == "database.url")
        );
    }

    #[test]
    fn test_database_config_min_exceeds_max() {
        let config = DatabaseConfig {
            url: "postgres://localhost/test".to_string(),
            max_connections: 5,
            min_connections: 10,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationError { field, .. } if field == "database.min_connections")
        );
    }

    #[test]
    fn test_oauth_config_missing_cipher_key() {
        let config = OAuthConfig::default();
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationError { field, .. } if field == "oauth.token_cipher_key")
        );
    }

    #[test]
    fn test_oauth_config_wrong_key_length() {
        let config = OAuthConfig {
            token_cipher_key: base64::engine::general_purpose::STANDARD_NO_PAD.encode([0u8; 16]),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationError { field, .. } if field == "oauth.token_cipher_key")
        );
    }

    #[test]
    fn test_oauth_config_valid_key() {
        let config = OAuthConfig {
            token_cipher_key: valid_cipher_key(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_logger_settings_invalid_level() {
        let settings = LoggerSettings {
            level: "invalid".to_string(),
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationError { field, .. } if field == "logger.level")
        );
    }

    #[test]
    fn test_logger_settings_file_enabled_empty_path() {
        let settings = LoggerSettings {
            file: FileSettings {
                enabled: true,
                path: "".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationError { field, .. } if field == "logger.file.path")
        );
    }

    #[test]
    fn test_settings_valid() {
        assert!(valid_settings().validate().is_ok());
    }

    #[test]
    fn test_settings_invalid_database() {
        let settings = Settings {
            database: DatabaseConfig::default(),
            ..valid_settings()
        };
        let err = settings.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationError { field, .. } if field == "database.url")
        );
    }

    #[test]
    fn test_settings_invalid_jwt() {
        let settings = Settings {
            jwt: JwtConfig::default(),
            ..valid_settings()
        };
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { field, .. } if field == "jwt.secret"));
    }
}
