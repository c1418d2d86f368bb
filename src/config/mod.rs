use once_cell::sync::Lazy;
use std::env;
use std::fmt;
use thiserror::Error;

/// Token lifetime used unless a deployment overrides it at startup.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// Range bcrypt accepts for its work factor.
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

/// Secret used only when running in development without JWT_SECRET.
const DEVELOPMENT_JWT_SECRET: &str = "cm-api-development-secret";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set in {0:?} mode")]
    MissingJwtSecret(Environment),

    #[error("SECURITY_TOKEN_TTL_MINUTES must be positive, got {0}")]
    InvalidTokenTtl(i64),

    #[error("SECURITY_BCRYPT_COST must be between 4 and 31, got {0}")]
    InvalidBcryptCost(u32),

    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub max_request_size_bytes: usize,
}

#[derive(Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub bcrypt_cost: u32,
    pub allow_registration: bool,
    pub cors_origins: Vec<String>,
}

// The signing secret never shows up in logs.
impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("allow_registration", &self.allow_registration)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Ok(v) = env::var("PORT") {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            if !v.is_empty() {
                self.security.jwt_secret = v;
            }
        }
        if let Ok(v) = env::var("SECURITY_TOKEN_TTL_MINUTES") {
            self.security.token_ttl_minutes = v.parse().unwrap_or(self.security.token_ttl_minutes);
        }
        if let Ok(v) = env::var("SECURITY_BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }
        if let Ok(v) = env::var("SECURITY_ALLOW_REGISTRATION") {
            self.security.allow_registration = v.parse().unwrap_or(self.security.allow_registration);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    /// Checks the settings that must hold before the server accepts traffic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment != Environment::Development
            && (self.security.jwt_secret.is_empty() || self.security.jwt_secret == DEVELOPMENT_JWT_SECRET)
        {
            return Err(ConfigError::MissingJwtSecret(self.environment));
        }
        if self.security.token_ttl_minutes <= 0 {
            return Err(ConfigError::InvalidTokenTtl(self.security.token_ttl_minutes));
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.security.bcrypt_cost) {
            return Err(ConfigError::InvalidBcryptCost(self.security.bcrypt_cost));
        }
        Ok(())
    }

    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database.url.as_deref().ok_or(ConfigError::MissingDatabaseUrl)
    }

    pub fn uses_development_secret(&self) -> bool {
        self.security.jwt_secret == DEVELOPMENT_JWT_SECRET
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                port: 3000,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
                token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
                bcrypt_cost: 10,
                allow_registration: true,
                cors_origins: vec![],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 10,
            },
            api: ApiConfig {
                port: 3000,
                max_request_size_bytes: 512 * 1024,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
                bcrypt_cost: 10,
                allow_registration: false,
                cors_origins: vec![],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 5,
            },
            api: ApiConfig {
                port: 3000,
                max_request_size_bytes: 256 * 1024,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
                bcrypt_cost: 12,
                allow_registration: false,
                cors_origins: vec![],
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
