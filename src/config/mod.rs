//! Environment-driven configuration
//!
//! All runtime parameters come from the environment at startup; nothing is
//! read at import time and no configuration is global. `AppConfig::from_env`
//! is called once in `main` and the resulting handles are injected into the
//! application state.

use jsonwebtoken::Algorithm;
use std::env;
use std::fmt;

/// Default bind address when `BIND_ADDR` is not set
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Token-verification parameters
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret for the HS-family signing algorithms
    pub secret: String,

    /// Signing algorithm, default HS256
    pub algorithm: Algorithm,

    /// Expected `iss` claim; unchecked when unset
    pub issuer: Option<String>,

    /// Expected `aud` claim; unchecked when unset
    pub audience: Option<String>,
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Connection string for the PostgreSQL backend; unused by the in-memory
    /// store
    pub database_url: Option<String>,

    /// Address the HTTP server binds to
    pub bind_addr: String,

    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load configuration from the environment
    ///
    /// `JWT_SECRET` is required. `DATABASE_URL` is required only when running
    /// with the `postgres` feature; its absence is reported at store
    /// construction, not here.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar {
            name: "JWT_SECRET",
        })?;

        let algorithm = match env::var("JWT_ALGORITHM") {
            Ok(value) => value
                .parse::<Algorithm>()
                .map_err(|_| ConfigError::InvalidValue {
                    name: "JWT_ALGORITHM",
                    value,
                })?,
            Err(_) => Algorithm::HS256,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok(),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            jwt: JwtConfig {
                secret,
                algorithm,
                issuer: env::var("JWT_ISSUER").ok(),
                audience: env::var("JWT_AUDIENCE").ok(),
            },
        })
    }
}

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Required environment variable is not set
    MissingVar { name: &'static str },

    /// Environment variable holds an unusable value
    InvalidValue { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVar { name } => {
                write!(f, "required environment variable '{}' is not set", name)
            }
            ConfigError::InvalidValue { name, value } => {
                write!(f, "invalid value '{}' for environment variable '{}'", value, name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
