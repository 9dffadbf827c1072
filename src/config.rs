use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT_SECRET is not set")]
    MissingSecret,
    #[error("invalid JWT_EXPIRES_IN value: {0:?}")]
    InvalidLifetime(String),
    #[error("invalid {name} value: {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub cors_origin: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't have to
    /// touch the process environment.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let database_url = match get("DATABASE_URL") {
            Some(url) => url,
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                var("DB_USERNAME", "postgres"),
                var("DB_PASSWORD", "postgres"),
                var("DB_HOST", "localhost"),
                var("DB_PORT", "5432"),
                var("DB_DATABASE", "user_management_db"),
            ),
        };

        let secret = get("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingSecret)?;
        let expires_in = var("JWT_EXPIRES_IN", "24h");
        let ttl = parse_lifetime(&expires_in).ok_or(ConfigError::InvalidLifetime(expires_in))?;

        let jwt = JwtConfig {
            secret,
            issuer: var("JWT_ISSUER", "usermgmt"),
            audience: var("JWT_AUDIENCE", "usermgmt-users"),
            ttl,
        };

        let port_raw = var("PORT", "3000");
        let port = port_raw
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                name: "PORT",
                value: port_raw,
            })?;

        Ok(Self {
            database_url,
            jwt,
            cors_origin: var("CORS_ORIGIN", "*"),
            host: var("APP_HOST", "0.0.0.0"),
            port,
        })
    }
}

/// Parses lifetimes like `3600`, `90s`, `30m`, `24h` or `7d`.
pub fn parse_lifetime(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);
    let amount: u64 = digits.parse().ok()?;
    let secs = match unit {
        "" | "s" => amount,
        "m" => amount.checked_mul(60)?,
        "h" => amount.checked_mul(60 * 60)?,
        "d" => amount.checked_mul(24 * 60 * 60)?,
        _ => return None,
    };
    if secs == 0 {
        return None;
    }
    Some(Duration::from_secs(secs))
}
