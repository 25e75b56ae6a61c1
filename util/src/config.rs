//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.
//!
//! Most callers use the free getter functions at the bottom of this module
//! (`config::host()`, `config::jwt_secret()`, ...).

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_duration_minutes: u64,
    /// Shared cache backend. When absent the nonce store and rate limiter
    /// fall back to an in-process map.
    pub redis_url: Option<String>,
    /// Honour `X-Forwarded-For` when deriving the client IP.
    pub trust_proxy: bool,
    pub checkin_nonce_ttl_seconds: u64,
    /// Emails the seeder provisions as admin accounts.
    pub superuser_emails: Vec<String>,
    /// Browser origins allowed to call the API with credentials. Empty means
    /// same-origin only.
    pub cors_origins: Vec<String>,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

fn list_or_empty(key: &str) -> Vec<String> {
    var_or(key, "")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Invalid config value, using default");
            default
        }),
        Err(_) => default,
    }
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Missing values fall back to development defaults. `JWT_SECRET` defaults to
    /// an empty string; the server refuses to start with an empty secret.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: var_or("APP_ENV", "development"),
            project_name: var_or("PROJECT_NAME", "presensi"),
            log_level: var_or("LOG_LEVEL", "api=info"),
            log_file: var_or("LOG_FILE", "api.log"),
            log_to_stdout: var_or("LOG_TO_STDOUT", "false") == "true",
            database_path: var_or("DATABASE_PATH", "data/presensi.db"),
            host: var_or("HOST", "127.0.0.1"),
            port: parse_or("PORT", 3000),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_default(),
            jwt_duration_minutes: parse_or("JWT_DURATION_MINUTES", 60),
            redis_url: env::var("REDIS_URL").ok().filter(|s| !s.trim().is_empty()),
            trust_proxy: var_or("TRUST_PROXY", "false") == "true",
            checkin_nonce_ttl_seconds: parse_or("CHECKIN_NONCE_TTL_SECONDS", 60),
            superuser_emails: list_or_empty("SUPERUSER_EMAILS")
                .into_iter()
                .map(|s| s.to_lowercase())
                .collect(),
            cors_origins: list_or_empty("CORS_ORIGINS"),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock cannot be acquired.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock.write().expect("Failed to acquire AppConfig write lock");
            *guard = AppConfig::from_env();
        }
    }

    /// Generic internal setter for any field in the config.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }

    pub fn set_jwt_secret(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.jwt_secret = value.into());
    }

    pub fn set_jwt_duration_minutes(value: impl Into<u64>) {
        AppConfig::set_field(|cfg| cfg.jwt_duration_minutes = value.into());
    }

    pub fn set_redis_url(value: Option<String>) {
        AppConfig::set_field(|cfg| cfg.redis_url = value);
    }

    pub fn set_trust_proxy(value: bool) {
        AppConfig::set_field(|cfg| cfg.trust_proxy = value);
    }

    pub fn set_checkin_nonce_ttl_seconds(value: u64) {
        AppConfig::set_field(|cfg| cfg.checkin_nonce_ttl_seconds = value);
    }

    pub fn set_cors_origins(value: Vec<String>) {
        AppConfig::set_field(|cfg| cfg.cors_origins = value);
    }
}

// --- Free getters ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn is_production() -> bool {
    env().eq_ignore_ascii_case("production")
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn jwt_secret() -> String {
    AppConfig::global().jwt_secret.clone()
}

pub fn jwt_duration_minutes() -> u64 {
    AppConfig::global().jwt_duration_minutes
}

pub fn redis_url() -> Option<String> {
    AppConfig::global().redis_url.clone()
}

pub fn trust_proxy() -> bool {
    AppConfig::global().trust_proxy
}

pub fn checkin_nonce_ttl_seconds() -> u64 {
    AppConfig::global().checkin_nonce_ttl_seconds
}

pub fn superuser_emails() -> Vec<String> {
    AppConfig::global().superuser_emails.clone()
}

pub fn cors_origins() -> Vec<String> {
    AppConfig::global().cors_origins.clone()
}
