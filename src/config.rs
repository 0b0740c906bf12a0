use anyhow::Context;
use serde::Deserialize;
use time::UtcOffset;

use crate::clock::parse_offset;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    /// Offset every user-facing calendar day is computed in.
    pub tz_offset: UtcOffset,
    pub seed_catalog: bool,
    pub ai: AiConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "nutriai".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "nutriai-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        let raw_offset = std::env::var("APP_TZ_OFFSET").unwrap_or_else(|_| "+05:30".into());
        let tz_offset = parse_offset(&raw_offset)
            .with_context(|| format!("APP_TZ_OFFSET '{}' is not a ±HH:MM offset", raw_offset))?;
        let seed_catalog = std::env::var("SEED_CATALOG")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);
        let ai = AiConfig {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".into()),
        };
        Ok(Self {
            database_url,
            jwt,
            tz_offset,
            seed_catalog,
            ai,
        })
    }
}
