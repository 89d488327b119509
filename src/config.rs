// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Process configuration read from `config.toml` in the platform config dir.
//!
//! Household settings (interest rate, payment days) live in the repository;
//! this file only carries what the front end needs to start.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::APP;
use crate::rollover::DEFAULT_BACKFILL_DAYS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Edit-mode passcode. Plain text; not a security boundary.
    #[serde(default = "default_passcode")]
    pub passcode: String,
    #[serde(default = "default_user_id")]
    pub user_id: i64,
    #[serde(default = "default_backfill_days")]
    pub backfill_days: i64,
    #[serde(default = "default_rollover_interval")]
    pub rollover_interval_secs: u64,
    #[serde(default = "default_chart_days")]
    pub chart_days: i64,
}

fn default_passcode() -> String {
    "1234".to_string()
}
fn default_user_id() -> i64 {
    1
}
fn default_backfill_days() -> i64 {
    DEFAULT_BACKFILL_DAYS
}
fn default_rollover_interval() -> u64 {
    60
}
fn default_chart_days() -> i64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            passcode: default_passcode(),
            user_id: default_user_id(),
            backfill_days: default_backfill_days(),
            rollover_interval_secs: default_rollover_interval(),
            chart_days: default_chart_days(),
        }
    }
}

impl AppConfig {
    pub fn path() -> Result<PathBuf> {
        let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
            .context("Could not determine platform-specific config dir")?;
        Ok(proj.config_dir().join("config.toml"))
    }

    /// Read the config file; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Read config {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Parse config {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let cfg = AppConfig::parse("passcode = \"9999\"\nbackfill_days = 3\n").unwrap();
        assert_eq!(cfg.passcode, "9999");
        assert_eq!(cfg.backfill_days, 3);
        assert_eq!(cfg.rollover_interval_secs, 60);
        assert_eq!(cfg.chart_days, 30);
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }
}
