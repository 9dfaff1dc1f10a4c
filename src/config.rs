use std::env;
use std::fmt;

/// Validity window of issued tokens when `TOKEN_TTL_SECONDS` is not set.
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 360_000;

/// Problems that prevent the server from starting.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is absent or empty.
    Missing(&'static str),
    /// A variable is present but cannot be parsed.
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} env variable value not provided", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_seconds: i64,
    pub server_port: u16,
    pub server_host: String,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// `DATABASE_URL` and `JWT_SECRET` are required.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let server_port = match lookup("SERVER_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "SERVER_PORT",
                value,
            })?,
            None => 8080,
        };

        let token_ttl_seconds = match lookup("TOKEN_TTL_SECONDS") {
            Some(value) => match value.parse::<i64>() {
                Ok(ttl) if ttl > 0 => ttl,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "TOKEN_TTL_SECONDS",
                        value,
                    })
                }
            },
            None => DEFAULT_TOKEN_TTL_SECONDS,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            token_ttl_seconds,
            server_port,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
