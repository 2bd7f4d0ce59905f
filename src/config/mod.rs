//
//  releasehub-cli
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Configuration management for the ReleaseHub CLI, stored as TOML in the
//! platform config directory.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/rh/config.toml`
//! - **macOS**: `~/Library/Application Support/rh/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\rh\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! [core]
//! base_url = "https://releasehub.example.com"
//! locale = "en-US"
//! perm_mode = "soft"
//! ```
//!
//! The bearer token is *not* stored here; it lives in the system keyring
//! (see [`crate::session`]). The locale preference persists separately from
//! the token on purpose: logging out keeps the UI language.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::session::PermMode;

/// Fallback backend origin when neither the config file nor the
/// `RH_API_BASE_URL` environment variable provides one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Environment variable overriding the configured base URL.
pub const BASE_URL_ENV: &str = "RH_API_BASE_URL";

/// Global configuration container for the ReleaseHub CLI.
///
/// All fields use `#[serde(default)]` so partial config files load cleanly;
/// the file is created on first save.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Core CLI configuration options.
    #[serde(default)]
    pub core: CoreConfig,
}

/// Core configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Backend origin the HTTP client targets.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// UI locale preference, e.g. `en-US` or `zh-CN`.
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Permission-check behavior: `off`, `soft`, or `strict`.
    #[serde(default = "default_perm_mode")]
    pub perm_mode: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            locale: default_locale(),
            perm_mode: default_perm_mode(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_locale() -> String {
    "en-US".to_string()
}

fn default_perm_mode() -> String {
    "soft".to_string()
}

impl Config {
    /// Loads the configuration from the default location.
    ///
    /// A missing file yields the defaults; a malformed file is an error.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Loads the configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config at {}", path.display()))
    }

    /// Saves the configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Saves the configuration to an explicit path, creating parent
    /// directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(self).context("failed to serialize config")?;
        std::fs::write(path, raw)
            .with_context(|| format!("failed to write config at {}", path.display()))?;
        Ok(())
    }

    /// Path of the configuration file.
    pub fn path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .context("could not determine the config directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Effective backend origin: the `RH_API_BASE_URL` environment variable
    /// wins over the config file.
    pub fn base_url(&self) -> String {
        std::env::var(BASE_URL_ENV).unwrap_or_else(|_| self.core.base_url.clone())
    }

    /// Effective permission mode.
    pub fn perm_mode(&self) -> PermMode {
        PermMode::parse(&self.core.perm_mode)
    }

    /// Reads a core setting by name.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "base_url" => Some(self.core.base_url.clone()),
            "locale" => Some(self.core.locale.clone()),
            "perm_mode" => Some(self.core.perm_mode.clone()),
            _ => None,
        }
    }

    /// Writes a core setting by name. Unknown keys are an error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "base_url" => self.core.base_url = value.trim_end_matches('/').to_string(),
            "locale" => self.core.locale = value.to_string(),
            "perm_mode" => self.core.perm_mode = value.to_string(),
            _ => anyhow::bail!("unknown config key: {key} (expected base_url, locale, perm_mode)"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.core.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.core.locale, "en-US");
        assert_eq!(config.perm_mode(), PermMode::Soft);
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("base_url", "https://rh.example.com/").unwrap();
        config.set("locale", "zh-CN").unwrap();
        config.set("perm_mode", "strict").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.core.base_url, "https://rh.example.com");
        assert_eq!(loaded.core.locale, "zh-CN");
        assert_eq!(loaded.perm_mode(), PermMode::Strict);
    }

    #[test]
    fn partial_files_fill_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[core]\nlocale = \"zh-CN\"\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.core.locale, "zh-CN");
        assert_eq!(loaded.core.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut config = Config::default();
        assert!(config.set("token", "nope").is_err());
    }
}
