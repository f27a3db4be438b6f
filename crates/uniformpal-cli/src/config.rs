//! Backend selection: CLI flag, config file, then the profile default.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

/// Deployment profile; picks the default backend host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Profile {
  #[default]
  Development,
  Production,
}

impl Profile {
  pub fn default_base_url(&self) -> &'static str {
    match self {
      Self::Development => "http://localhost:5000",
      Self::Production => "https://uniformpal-backend.onrender.com",
    }
  }
}

/// Shape of the optional TOML config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
  #[serde(default)]
  pub url:      String,
  #[serde(default)]
  pub log_file: Option<std::path::PathBuf>,
}

impl ConfigFile {
  pub fn load(path: &Path) -> Result<Self> {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")
  }
}

/// CLI flags override the config file, which overrides the profile.
pub fn resolve_base_url(flag: Option<String>, file: &ConfigFile, profile: Profile) -> String {
  flag
    .filter(|u| !u.trim().is_empty())
    .or_else(|| (!file.url.trim().is_empty()).then(|| file.url.clone()))
    .unwrap_or_else(|| profile.default_base_url().to_string())
    .trim_end_matches('/')
    .to_string()
}
