use anyhow::{Context, Result, bail};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Minimum accepted length of the token signing key, in bytes.
const MIN_SECRET_LEN: usize = 32;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub api_prefix: String,
    pub access_token_ttl: i64,

    // Store pool
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,

    // Password hashing cost
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,

    pub log_dir: String,
    pub log_level: tracing::Level,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            bail!("JWT_SECRET must be at least {MIN_SECRET_LEN} bytes long");
        }

        let server_addr = match lookup("SERVER_ADDR") {
            Some(addr) => addr,
            None => {
                let port: u16 = parse_or(&lookup, "PORT", 8080)?;
                format!("0.0.0.0:{port}")
            }
        };

        let access_token_ttl: i64 = parse_or(&lookup, "ACCESS_TOKEN_TTL", 86_400)?; // 24h
        if access_token_ttl <= 0 {
            bail!("ACCESS_TOKEN_TTL must be positive");
        }

        Ok(Self {
            database_url,
            jwt_secret,
            server_addr,
            api_prefix: lookup("API_PREFIX").unwrap_or_else(|| "/api".to_string()),
            access_token_ttl,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            db_acquire_timeout_secs: parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 5)?,
            argon2_memory_kib: parse_or(&lookup, "ARGON2_MEMORY_KIB", 19_456)?,
            argon2_iterations: parse_or(&lookup, "ARGON2_ITERATIONS", 2)?,
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            log_level: parse_or(&lookup, "LOG_LEVEL", tracing::Level::INFO)?,
        })
    }
}

// Hand-written so the signing key never reaches a log line.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("jwt_secret", &"<redacted>")
            .field("server_addr", &self.server_addr)
            .field("api_prefix", &self.api_prefix)
            .field("access_token_ttl", &self.access_token_ttl)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("argon2_memory_kib", &self.argon2_memory_kib)
            .field("argon2_iterations", &self.argon2_iterations)
            .field("log_dir", &self.log_dir)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{key} has an invalid value {raw:?}: {e}")),
        None => Ok(default),
    }
}
