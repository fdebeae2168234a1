use std::str::FromStr;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Lifetime of a session; drives both the token `exp` and the cookie `Max-Age`.
    pub ttl_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub frontend_url: String,
    pub jwt: JwtConfig,
    pub cookie: CookieConfig,
    pub chat: ChatConfig,
}

/// Longest accepted session lifetime.
pub const MAX_SESSION_TTL_DAYS: i64 = 3650;

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn check_ttl_days(days: i64) -> anyhow::Result<i64> {
    if !(1..=MAX_SESSION_TTL_DAYS).contains(&days) {
        anyhow::bail!("SESSION_TTL_DAYS must be between 1 and {MAX_SESSION_TTL_DAYS}, got {days}");
    }
    Ok(days)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        let jwt = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "fintrack".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "fintrack-users".into()),
            ttl_days: check_ttl_days(env_or("SESSION_TTL_DAYS", 15))?,
        };

        let cookie = CookieConfig {
            name: std::env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| "jwtToken".into()),
            secure: env_or("COOKIE_SECURE", true),
        };

        let chat = ChatConfig {
            api_key: std::env::var("CHAT_BOT_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            api_url: std::env::var("CHAT_API_URL")
                .unwrap_or_else(|_| "https://openrouter.ai/api/v1/chat/completions".into()),
            model: std::env::var("CHAT_MODEL")
                .unwrap_or_else(|_| "mistralai/mistral-7b-instruct".into()),
            max_tokens: env_or("CHAT_MAX_TOKENS", 50),
            timeout_secs: env_or("CHAT_TIMEOUT_SECS", 60),
        };

        Ok(Self {
            database_url,
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            jwt,
            cookie,
            chat,
        })
    }
}
