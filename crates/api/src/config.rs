use std::str::FromStr;
use std::time::Duration;

use kitchen_cloud::{CloudinaryConfig, CompressionSettings, LlmConfig};

use crate::auth::jwt::JwtConfig;

/// Which [`DocumentStore`](kitchen_core::store::DocumentStore) backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// In-process and empty on every start; for local development.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown document store '{other}'")),
        }
    }
}

/// The single admin account.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
}

impl AdminAccount {
    /// # Panics
    ///
    /// Panics if `ADMIN_EMAIL` or `ADMIN_PASSWORD_HASH` is unset or empty.
    pub fn from_env() -> Self {
        let email = std::env::var("ADMIN_EMAIL").expect("ADMIN_EMAIL must be set in the environment");
        let password_hash = std::env::var("ADMIN_PASSWORD_HASH")
            .expect("ADMIN_PASSWORD_HASH must be set in the environment");
        assert!(!email.trim().is_empty(), "ADMIN_EMAIL must not be empty");
        assert!(
            password_hash.starts_with("$argon2"),
            "ADMIN_PASSWORD_HASH must be an Argon2 PHC string"
        );
        Self {
            email: email.trim().to_string(),
            password_hash,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long background tasks get to finish after the listener closes.
    pub shutdown_timeout_secs: u64,
    /// Largest accepted upload body (default: 10 MiB).
    pub upload_max_bytes: usize,
    pub document_store: StoreBackend,
    /// Required for [`StoreBackend::Postgres`].
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub admin: AdminAccount,
    pub cloudinary: CloudinaryConfig,
    pub compression: CompressionSettings,
    /// `None` disables search-term expansion.
    pub llm: Option<LlmConfig>,
    pub search_cache_ttl: Duration,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `HOST`                  | `0.0.0.0`                |
    /// | `PORT`                  | `3000`                   |
    /// | `CORS_ORIGINS`          | `http://localhost:3001`  |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `10`                     |
    /// | `UPLOAD_MAX_BYTES`      | `10485760`               |
    /// | `DOCUMENT_STORE`        | `postgres`               |
    /// | `DATABASE_URL`          | required for postgres    |
    /// | `UPLOAD_MAX_DIMENSION`  | `1200`                   |
    /// | `UPLOAD_JPEG_QUALITY`   | `80`                     |
    /// | `SEARCH_CACHE_TTL_SECS` | `3600`                   |
    ///
    /// JWT, admin, Cloudinary and language-model settings are read by
    /// [`JwtConfig::from_env`], [`AdminAccount::from_env`],
    /// [`CloudinaryConfig::from_env`] and [`LlmConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = parse_var("PORT", "3000");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3001".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = parse_var("REQUEST_TIMEOUT_SECS", "30");
        let shutdown_timeout_secs: u64 = parse_var("SHUTDOWN_TIMEOUT_SECS", "10");
        let upload_max_bytes: usize = parse_var("UPLOAD_MAX_BYTES", "10485760");

        let document_store: StoreBackend = parse_var("DOCUMENT_STORE", "postgres");
        let database_url = std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());
        if document_store == StoreBackend::Postgres {
            assert!(
                database_url.is_some(),
                "DATABASE_URL must be set unless DOCUMENT_STORE=memory"
            );
        }

        let compression = CompressionSettings {
            max_dimension: parse_var("UPLOAD_MAX_DIMENSION", "1200"),
            jpeg_quality: parse_var("UPLOAD_JPEG_QUALITY", "80"),
        };

        let search_cache_ttl = Duration::from_secs(parse_var("SEARCH_CACHE_TTL_SECS", "3600"));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            upload_max_bytes,
            document_store,
            database_url,
            jwt: JwtConfig::from_env(),
            admin: AdminAccount::from_env(),
            cloudinary: CloudinaryConfig::from_env(),
            compression,
            llm: LlmConfig::from_env(),
            search_cache_ttl,
        }
    }
}

/// Read `key` (or `default`) and parse it, panicking with the key name.
pub(crate) fn parse_var<T>(key: &str, default: &str) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}"))
}
