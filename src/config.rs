// src/config.rs

use anyhow::{ensure, Context, Result};
use std::{env, time::Duration};
use url::Url;

use crate::fetch::SHEET_URL;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime settings, read from `SHEET_URL`, `SHEET_TIMEOUT_SECS` and `LOG_LEVEL`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub sheet_url: Url,
    pub timeout: Duration,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet_url: Url::parse(SHEET_URL).expect("built-in sheet URL should parse"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = Config::default();

        if let Some(raw) = get("SHEET_URL") {
            cfg.sheet_url = parse_sheet_url(&raw)?;
        }
        if let Some(raw) = get("SHEET_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("SHEET_TIMEOUT_SECS must be whole seconds, got {:?}", raw))?;
            cfg.timeout = Duration::from_secs(secs);
        }
        if let Some(level) = get("LOG_LEVEL") {
            cfg.log_level = level;
        }
        Ok(cfg)
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(mut self, url: Option<&str>, timeout_secs: Option<u64>) -> Result<Self> {
        if let Some(raw) = url {
            self.sheet_url = parse_sheet_url(raw)?;
        }
        if let Some(secs) = timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        Ok(self)
    }
}

fn parse_sheet_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("parsing sheet URL {:?}", raw))?;
    ensure!(
        matches!(url.scheme(), "http" | "https"),
        "sheet URL must be http or https, got {}",
        url.scheme()
    );
    Ok(url)
}
