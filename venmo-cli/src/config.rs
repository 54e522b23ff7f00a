use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use venmo_feed::FeedConfig;

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "VENMO_EXPORT_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub feed: FeedSection,
    pub export: ExportSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedSection {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportSection {
    /// IANA zone used for the cutoff date and for story timestamps without an offset.
    pub timezone: String,
    /// Write `Amount,Date,Type,Note` instead of the historical header.
    pub corrected_header: bool,
}

impl Default for FeedSection {
    fn default() -> Self {
        let feed = FeedConfig::default();
        Self {
            base_url: feed.base_url,
            timeout_secs: feed.timeout.as_secs(),
            user_agent: feed.user_agent,
        }
    }
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            corrected_header: false,
        }
    }
}

impl Config {
    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            base_url: self.feed.base_url.clone(),
            timeout: Duration::from_secs(self.feed.timeout_secs),
            user_agent: self.feed.user_agent.clone(),
        }
    }

    pub fn zone(&self) -> Result<Tz> {
        let name = &self.export.timezone;
        name.parse()
            .map_err(|_| anyhow::anyhow!("invalid timezone in config: {name}"))
    }
}

pub fn config_path() -> Result<PathBuf> {
    if let Ok(p) = std::env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(p));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".venmo-export").join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = match config_path() {
        Ok(p) => p,
        // no HOME and no override: nothing to load
        Err(_) => return Ok(Config::default()),
    };
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}
