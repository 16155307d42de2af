//! Configuration module for cvh-drawer

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::browse::DEFAULT_RECENT_LIMIT;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Maximum number of search results shown
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Size of the recently used section
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    /// Show border
    #[serde(default = "default_border")]
    pub border: bool,

    /// Terminal used for `Terminal=true` applications
    #[serde(default = "default_terminal")]
    pub terminal: String,

    /// Extra application directories, searched after the XDG ones
    #[serde(default)]
    pub app_dirs: Vec<PathBuf>,

    /// App store location
    #[serde(default)]
    pub store_path: Option<PathBuf>,

    /// Colors
    #[serde(default)]
    pub colors: Colors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Colors {
    #[serde(default = "default_fg")]
    pub fg: String,

    #[serde(default = "default_bg")]
    pub bg: String,

    #[serde(default = "default_highlight")]
    pub highlight: String,

    #[serde(default = "default_border_color")]
    pub border: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            recent_limit: default_recent_limit(),
            border: default_border(),
            terminal: default_terminal(),
            app_dirs: Vec::new(),
            store_path: None,
            colors: Colors::default(),
        }
    }
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight: default_highlight(),
            border: default_border_color(),
        }
    }
}

fn default_max_results() -> usize {
    50
}

fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

fn default_border() -> bool {
    true
}

fn default_terminal() -> String {
    "foot".to_string()
}

fn default_fg() -> String {
    "#eceff4".to_string()
}

fn default_bg() -> String {
    "#2e3440".to_string()
}

fn default_highlight() -> String {
    "#88c0d0".to_string()
}

fn default_border_color() -> String {
    "#4c566a".to_string()
}

impl Config {
    /// Load configuration from `path`, the XDG config file, or defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // An explicit path must exist
        if let Some(p) = path {
            return Self::from_file(p);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_file = config_dir.join("cvh-drawer/config.toml");
            if config_file.exists() {
                return Self::from_file(&config_file);
            }
        }

        Ok(Self::default())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Store path, falling back to the XDG data directory
    pub fn store_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(crate::store::default_path)
    }
}
