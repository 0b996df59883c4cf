use std::env;

use auth::PasswordError;
use auth::PasswordHasher;
use auth::SecretError;
use auth::SigningSecret;
use chrono::Duration;
use chrono::Utc;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Absent means the in-memory credential store is used.
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: SecretString,
    #[serde(default = "default_expiration_seconds")]
    pub expiration_seconds: i64,
}

/// Argon2 work factor.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: PasswordHasher::DEFAULT_MEMORY_KIB,
            iterations: PasswordHasher::DEFAULT_ITERATIONS,
            parallelism: PasswordHasher::DEFAULT_PARALLELISM,
        }
    }
}

/// Invalid `jwt.expiration_seconds`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenTtlError {
    #[error("jwt.expiration_seconds must be positive, got {0}")]
    NotPositive(i64),

    #[error("jwt.expiration_seconds is too large: {0}")]
    OutOfRange(i64),
}

fn default_max_connections() -> u32 {
    5
}

fn default_expiration_seconds() -> i64 {
    3600
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, SERVER__HTTP_PORT, DATABASE__URL, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config
            .token_ttl()
            .map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(config)
    }

    /// Build the process signing secret.
    ///
    /// # Errors
    /// * `Empty` - `jwt.secret` is empty
    pub fn signing_secret(&self) -> Result<SigningSecret, SecretError> {
        SigningSecret::from_secret(self.jwt.secret.clone())
    }

    /// Lifetime of issued tokens.
    ///
    /// # Errors
    /// * `NotPositive` - `jwt.expiration_seconds` is zero or negative
    /// * `OutOfRange` - Expiry would fall outside the representable calendar
    pub fn token_ttl(&self) -> Result<Duration, TokenTtlError> {
        let seconds = self.jwt.expiration_seconds;
        if seconds <= 0 {
            return Err(TokenTtlError::NotPositive(seconds));
        }

        let ttl = Duration::try_seconds(seconds).ok_or(TokenTtlError::OutOfRange(seconds))?;
        if Utc::now().checked_add_signed(ttl).is_none() {
            return Err(TokenTtlError::OutOfRange(seconds));
        }

        Ok(ttl)
    }
}

impl PasswordConfig {
    /// Build a hasher with this work factor.
    ///
    /// # Errors
    /// * `InvalidCost` - Parameters rejected by Argon2
    pub fn hasher(&self) -> Result<PasswordHasher, PasswordError> {
        PasswordHasher::with_cost(self.memory_kib, self.iterations, self.parallelism)
    }
}
