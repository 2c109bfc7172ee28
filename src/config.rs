use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::api::Endpoint;
use crate::model::settings::{Detector, MatchMode, Settings, Threshold};

/// Environment variable consulted when the config file has no `api_url`
pub const API_URL_ENV: &str = "FACESORT_API_URL";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base address of the sort service
    pub api_url: Option<String>,
    /// Command used to open a preview URL externally
    pub open_command: Option<String>,
    /// Where downloaded archives are written
    pub download_dir: Option<PathBuf>,
    pub image_preview_enabled: bool,
    /// auto, kitty, iterm2, sixel or halfblocks
    pub image_protocol: String,

    // Initial job settings
    pub mode: MatchMode,
    pub detector: Detector,
    pub similarity_threshold: Threshold,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            open_command: None,
            download_dir: None,
            image_preview_enabled: true,
            image_protocol: "auto".to_string(),
            mode: MatchMode::default(),
            detector: Detector::default(),
            similarity_threshold: Threshold::default(),
        }
    }
}

impl Config {
    /// Parse a YAML config document
    pub fn from_yaml(text: &str) -> Result<Self> {
        // An empty file is a valid "all defaults" config
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("Invalid config file")
    }

    /// Load from `path`, or defaults when no config file exists
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                Self::from_yaml(&text)
                    .with_context(|| format!("Failed to load config {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Fill in `api_url`: a command-line value wins, then the file, then the environment
    pub fn apply_api_url(&mut self, cli: Option<String>, env: Option<String>) {
        let from_file = self.api_url.take().filter(|u| !u.trim().is_empty());
        self.api_url = cli.or(from_file).or(env);
    }

    /// Service endpoint; empty or whitespace means not configured
    pub fn endpoint(&self) -> Option<Endpoint> {
        self.api_url.as_deref().and_then(Endpoint::parse)
    }

    pub fn settings(&self) -> Settings {
        Settings {
            mode: self.mode,
            detector: self.detector,
            threshold: self.similarity_threshold,
        }
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn open_command(&self) -> String {
        self.open_command
            .clone()
            .unwrap_or_else(|| default_open_command().to_string())
    }
}

fn default_open_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Determine the config file path with fallback logic
///
/// An explicit path must exist. Otherwise `<config_dir>/facesort/config.yaml`
/// then `./config.yaml` are tried; finding neither is not an error.
pub fn resolve_config_path(cli_path: Option<&str>) -> Result<Option<PathBuf>> {
    if let Some(path) = cli_path {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(Some(path));
        }
        anyhow::bail!("Config file not found at specified path: {}", path.display());
    }

    if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("facesort").join("config.yaml");
        if config_path.exists() {
            return Ok(Some(config_path));
        }
    }

    let local_config = PathBuf::from("config.yaml");
    if local_config.exists() {
        return Ok(Some(local_config));
    }

    Ok(None)
}
