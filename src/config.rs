use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::errors::{constants, Result};
use crate::pptx::media::PlacementConfig;

/// Settings read from the optional TOML config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub credentials_path: Option<PathBuf>,
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub effects: Option<Vec<String>>,
    pub placement: PlacementConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str::<Config>(content)?)
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or(constants::GCP_TTS_ENDPOINT)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(constants::TTS_TIMEOUT_SECS))
    }

    /// Effects profiles, falling back to the default handset profile.
    pub fn effects(&self) -> Vec<String> {
        self.effects
            .clone()
            .unwrap_or_else(|| vec![constants::DEFAULT_EFFECTS_PROFILE.to_string()])
    }

    /// Apply command line overrides on top of the file values.
    pub fn merge(
        mut self,
        credentials_path: Option<PathBuf>,
        api_key: Option<String>,
        effects: Vec<String>,
    ) -> Self {
        if credentials_path.is_some() {
            self.credentials_path = credentials_path;
        }
        if api_key.is_some() {
            self.api_key = api_key;
        }
        if !effects.is_empty() {
            self.effects = Some(effects);
        }
        self
    }
}
