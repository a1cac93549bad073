//! Configuration management for joukko
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Environment variables (JOUKKO_*)
//! 2. Config file (~/.config/joukko/config.toml)
//! 3. Default values

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default name of the session descriptor file at the repository root
pub const DEFAULT_DESCRIPTOR_FILE: &str = ".joukko";

/// Session-related configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Remote the session branch is shared through
    pub remote: String,

    /// File name of the session descriptor, relative to the repository root
    pub descriptor_file: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            descriptor_file: DEFAULT_DESCRIPTOR_FILE.to_string(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Session configuration
    pub session: SessionConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/joukko/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("joukko").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - JOUKKO_REMOTE: Remote to share the session branch through
    /// - JOUKKO_FILE: Descriptor file name
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var("JOUKKO_REMOTE").ok(),
            std::env::var("JOUKKO_FILE").ok(),
        )
    }

    fn with_overrides(mut self, remote: Option<String>, descriptor_file: Option<String>) -> Self {
        if let Some(remote) = remote.filter(|r| !r.trim().is_empty()) {
            self.session.remote = remote;
        }

        if let Some(file) = descriptor_file.filter(|f| !f.trim().is_empty()) {
            self.session.descriptor_file = file;
        }

        self
    }

    /// Load configuration with environment overrides applied
    pub fn load_with_env() -> Result<Self> {
        Ok(Self::load()?.with_env_overrides())
    }
}
