use std::env;

use chrono::FixedOffset;

use crate::services::notice::BlankedDraftPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL URL. Without it the API runs on the in-memory store.
    pub database_url: Option<String>,
    /// Shared passphrase that unlocks the notice board.
    pub access_code: String,
    pub host: String,
    pub port: u16,
    pub app_base_url: String,
    /// Offset used for "today" and the weekday name (default: +05:30).
    pub utc_offset: FixedOffset,
    pub blanked_policy: BlankedDraftPolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|s| !s.is_empty());

        let offset_minutes: i32 = var("NOTICE_UTC_OFFSET_MINUTES")
            .unwrap_or_else(|| "330".into())
            .parse()?;
        let utc_offset = FixedOffset::east_opt(offset_minutes * 60).ok_or_else(|| {
            anyhow::anyhow!("NOTICE_UTC_OFFSET_MINUTES out of range: {}", offset_minutes)
        })?;

        Ok(Self {
            database_url: var("DATABASE_URL"),
            access_code: var("ACCESS_CODE")
                .ok_or_else(|| anyhow::anyhow!("Missing required env var: ACCESS_CODE"))?,
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: var("PORT").unwrap_or_else(|| "8080".into()).parse()?,
            app_base_url: var("APP_BASE_URL").unwrap_or_else(|| "http://localhost".into()),
            utc_offset,
            blanked_policy: var("BLANKED_ANNOUNCEMENT_POLICY")
                .map(|v| v.parse::<BlankedDraftPolicy>())
                .transpose()?
                .unwrap_or_default(),
        })
    }
}
