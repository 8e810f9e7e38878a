use std::time::Duration;

use anyhow::{Context, Result};

use crate::lifecycle::{EditPolicy, RegistrySettings};

const DEFAULT_BRAND_NAME: &str = "TalentWise HR";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_SESSION_IDLE_SECS: u64 = 60 * 60;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Ceiling on records per session.
    pub max_records: usize,
    /// When true, editing a Ready record sends it back to Incomplete.
    pub revert_ready_on_edit: bool,
    pub brand_name: String,
    pub max_upload_bytes: usize,
    /// Sessions untouched for this long are dropped with their records.
    pub session_idle_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_records: parse_env("MAX_RECORDS", crate::lifecycle::registry::DEFAULT_MAX_RECORDS)?,
            revert_ready_on_edit: parse_env("REVERT_READY_ON_EDIT", false)?,
            brand_name: std::env::var("BRAND_NAME")
                .unwrap_or_else(|_| DEFAULT_BRAND_NAME.to_string()),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            session_idle_secs: parse_env("SESSION_IDLE_SECS", DEFAULT_SESSION_IDLE_SECS)?,
        })
    }

    pub fn session_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    pub fn registry_settings(&self) -> RegistrySettings {
        RegistrySettings {
            max_records: self.max_records,
            edit_policy: if self.revert_ready_on_edit {
                EditPolicy::RevertReadyToIncomplete
            } else {
                EditPolicy::KeepStatus
            },
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}
