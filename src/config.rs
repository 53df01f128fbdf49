//! Server configuration: an optional TOML file overlaid with environment
//! variables for the credentials.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use crate::geocode::GOOGLE_MAPS_API;

const GITHUB_API: &str = "https://api.github.com";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub geocoder: GeocoderConfig,
    pub silhouettes: SilhouettesConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeocoderConfig {
    pub api_url: String,
    /// Overridden by `MAPS_API_KEY`
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SilhouettesConfig {
    pub api_url: String,
    /// Overridden by `GITHUB_OWNER`
    pub owner: String,
    /// Overridden by `GITHUB_REPO`
    pub repo: String,
    /// Overridden by `GITHUB_BRANCH`
    pub branch: String,
    /// Directory inside the repository holding `<slug>.png` files
    pub directory: String,
    /// Overridden by `GITHUB_TOKEN`; anonymous requests are rate limited
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            api_url: GOOGLE_MAPS_API.to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl Default for SilhouettesConfig {
    fn default() -> Self {
        Self {
            api_url: GITHUB_API.to_string(),
            owner: String::new(),
            repo: String::new(),
            branch: "main".to_string(),
            directory: "silhouettes".to_string(),
            token: None,
            timeout_secs: 15,
        }
    }
}

impl GeocoderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// File (if any) overlaid with the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply credential overrides; empty values are ignored
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = value("MAPS_API_KEY") {
            self.geocoder.api_key = Some(key);
        }
        if let Some(token) = value("GITHUB_TOKEN") {
            self.silhouettes.token = Some(token);
        }
        if let Some(owner) = value("GITHUB_OWNER") {
            self.silhouettes.owner = owner;
        }
        if let Some(repo) = value("GITHUB_REPO") {
            self.silhouettes.repo = repo;
        }
        if let Some(branch) = value("GITHUB_BRANCH") {
            self.silhouettes.branch = branch;
        }
    }

    /// Check that everything needed to serve a game is present
    pub fn validate(&self) -> Result<()> {
        if self.geocoder.api_key.as_deref().map_or(true, str::is_empty) {
            anyhow::bail!("MAPS_API_KEY is not set");
        }
        if self.silhouettes.owner.is_empty() || self.silhouettes.repo.is_empty() {
            anyhow::bail!("GITHUB_OWNER and GITHUB_REPO must be set");
        }
        if self.silhouettes.branch.is_empty() {
            anyhow::bail!("GITHUB_BRANCH must not be empty");
        }
        if self.geocoder.timeout_secs == 0 || self.silhouettes.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero");
        }
        if self.silhouettes.token.is_none() {
            warn!("GITHUB_TOKEN is not set; silhouette requests will be anonymous");
        }
        Ok(())
    }
}
