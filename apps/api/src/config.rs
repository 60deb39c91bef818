use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::{FixedOffset, Offset, Utc};

use crate::audit::alerts::{default_rules, SecurityAlertRule, MAX_WINDOW_MINUTES};
use crate::store::StoreBackend;

/// Application configuration loaded from environment variables.
/// Only the variables of the selected store backend are required.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub store_backend: StoreBackend,
    pub redis_url: Option<String>,
    pub database_url: Option<String>,
    pub store_timeout_ms: u64,
    pub audit_retention: usize,
    pub history_retention: usize,
    pub emotion_trend_retention: usize,
    /// Offset used for day boundaries in streaks and usage patterns.
    pub analytics_offset: FixedOffset,
    pub alert_rules: Vec<SecurityAlertRule>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let offset_minutes: i32 = parse_env("ANALYTICS_UTC_OFFSET_MINUTES", 0)?;
        let analytics_offset = FixedOffset::east_opt(offset_minutes * 60).with_context(|| {
            format!("ANALYTICS_UTC_OFFSET_MINUTES={offset_minutes} is out of range")
        })?;

        let alert_rules = match std::env::var("ALERT_RULES_PATH") {
            Ok(path) => load_alert_rules(PathBuf::from(path))?,
            Err(_) => default_rules(),
        };

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            store_backend: parse_env("STORE_BACKEND", StoreBackend::Memory)?,
            redis_url: std::env::var("REDIS_URL").ok(),
            database_url: std::env::var("DATABASE_URL").ok(),
            store_timeout_ms: parse_env("STORE_TIMEOUT_MS", 2000)?,
            audit_retention: parse_env("AUDIT_RETENTION", 1000)?,
            history_retention: parse_env("HISTORY_RETENTION", 100)?,
            emotion_trend_retention: parse_env("EMOTION_TREND_RETENTION", 100)?,
            analytics_offset,
            alert_rules,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            store_backend: StoreBackend::Memory,
            redis_url: None,
            database_url: None,
            store_timeout_ms: 2000,
            audit_retention: 1000,
            history_retention: 100,
            emotion_trend_retention: 100,
            analytics_offset: Utc.fix(),
            alert_rules: default_rules(),
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn load_alert_rules(path: PathBuf) -> Result<Vec<SecurityAlertRule>> {
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read alert rules from {}", path.display()))?;
    parse_alert_rules(&raw)
        .with_context(|| format!("Invalid alert rules file {}", path.display()))
}

fn parse_alert_rules(raw: &str) -> Result<Vec<SecurityAlertRule>> {
    let rules: Vec<SecurityAlertRule> =
        serde_json::from_str(raw).context("Alert rules are not valid JSON")?;
    for rule in &rules {
        validate_alert_rule(rule)?;
    }
    Ok(rules)
}

fn validate_alert_rule(rule: &SecurityAlertRule) -> Result<()> {
    if rule.threshold == 0 {
        bail!("Alert rule '{}' has threshold 0; it must be at least 1", rule.id);
    }
    if rule.window_minutes <= 0 || rule.window_minutes > MAX_WINDOW_MINUTES {
        bail!(
            "Alert rule '{}' has window_minutes {}; expected 1..={MAX_WINDOW_MINUTES}",
            rule.id,
            rule.window_minutes
        );
    }
    Ok(())
}
