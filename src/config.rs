// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Connection settings for the hosted record store.
//!
//! Resolution order: built-in defaults, then `config.toml` (from
//! `SMARTBUDGET_CONFIG` or the platform config directory), then
//! `SMARTBUDGET_*` environment variables.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::{Error, Result};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "SmartBudget", "smartbudget"));

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_url: String,
    pub project_id: String,
    pub public_key: String,
    /// ISO code used when formatting amounts.
    pub currency: String,
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            project_id: String::new(),
            public_key: String::new(),
            currency: "USD".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Overrides fields from `SMARTBUDGET_*` variables found by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SMARTBUDGET_API_URL") {
            self.api_url = v;
        }
        if let Some(v) = lookup("SMARTBUDGET_PROJECT_ID") {
            self.project_id = v;
        }
        if let Some(v) = lookup("SMARTBUDGET_PUBLIC_KEY") {
            self.public_key = v;
        }
        if let Some(v) = lookup("SMARTBUDGET_CURRENCY") {
            self.currency = v.to_uppercase();
        }
        if let Some(v) = lookup("SMARTBUDGET_TIMEOUT_SECS") {
            self.timeout_secs = v.trim().parse().map_err(|_| {
                Error::Config(format!("SMARTBUDGET_TIMEOUT_SECS must be seconds, got '{}'", v))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            return Err(Error::Config(
                "missing project id (set SMARTBUDGET_PROJECT_ID or project_id in config.toml)"
                    .into(),
            ));
        }
        if self.public_key.trim().is_empty() {
            return Err(Error::Config(
                "missing public key (set SMARTBUDGET_PUBLIC_KEY or public_key in config.toml)"
                    .into(),
            ));
        }
        if self.api_url.trim().is_empty() {
            return Err(Error::Config(
                "missing api url (set SMARTBUDGET_API_URL or api_url in config.toml)".into(),
            ));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "api_url must be an http(s) URL, got '{}'",
                self.api_url
            )));
        }
        Ok(())
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("SMARTBUDGET_CONFIG") {
        return Some(PathBuf::from(p));
    }
    ProjectDirs::from(APP.0, APP.1, APP.2).map(|proj| proj.config_dir().join("config.toml"))
}

/// Reads `path` if it exists; a missing file yields defaults.
pub fn load_file(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        debug!("No config file at {}", path.display());
        return Ok(AppConfig::default());
    }
    info!("Loading configuration from {}", path.display());
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    AppConfig::from_toml_str(&contents)
}

pub fn load() -> Result<AppConfig> {
    let mut cfg = match config_path() {
        Some(p) => load_file(&p)?,
        None => AppConfig::default(),
    };
    cfg.apply_env(|k| std::env::var(k).ok())?;
    cfg.validate()?;
    Ok(cfg)
}
