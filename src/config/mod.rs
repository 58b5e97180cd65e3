use std::env;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub session_secret: String,
    pub session_expiration_secs: u64,
    pub bcrypt_cost: u32,
    pub app_env: String,
}

// 会话默认有效期：7 天
const DEFAULT_SESSION_DAYS: u64 = 7;

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let session_days = parse_or("SESSION_EXPIRATION", DEFAULT_SESSION_DAYS, |v| {
            v.trim_end_matches('d').parse::<u64>().ok()
        })?;

        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://blog.db?mode=rwc".into()),
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5, |v| v.parse().ok())?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            server_port: parse_or("SERVER_PORT", 3000, |v| v.parse().ok())?,
            api_base_uri: env::var("API_BASE_URI").unwrap_or_else(|_| "/api".into()),
            session_secret: env::var("SESSION_SECRET")
                .map_err(|_| ConfigError::Missing("SESSION_SECRET"))?,
            session_expiration_secs: days_to_secs("SESSION_EXPIRATION", session_days)?,
            bcrypt_cost: parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST, |v| v.parse().ok())?,
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
        })
    }

    pub fn session_expiration(&self) -> Duration {
        Duration::from_secs(self.session_expiration_secs)
    }

    /// 本地开发环境下 cookie 不设置 Secure
    pub fn is_local(&self) -> bool {
        matches!(self.app_env.as_str(), "development" | "local")
    }
}

fn days_to_secs(name: &'static str, days: u64) -> Result<u64, ConfigError> {
    days.checked_mul(24 * 3600).ok_or(ConfigError::Invalid {
        name,
        value: format!("{days}d"),
    })
}

fn parse_or<T>(
    name: &'static str,
    default: T,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => parse(value.trim()).ok_or(ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
