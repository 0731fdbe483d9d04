//! Application configuration.

use std::{fs, path::PathBuf};

use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{JournalError, Result};

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory where the persisted documents live
    pub data_dir: PathBuf,

    /// API key for the AI collaborator; the GEMINI_API_KEY environment
    /// variable takes over when absent
    pub api_key: Option<String>,
}

impl Config {
    /// Loads the configuration from the given file, or builds the default
    /// one when no file is supplied or present.
    pub fn load(path: Option<PathBuf>) -> Result<Config> {
        if let Some(path) = path {
            let raw = fs::read_to_string(&path).map_err(|_| JournalError::ConfigError {
                message: format!("Cannot read config file: {}", path.display()),
            })?;
            let config: Config =
                serde_json::from_str(&raw).map_err(|e| JournalError::ConfigError {
                    message: format!("Malformed config file {}: {}", path.display(), e),
                })?;
            debug!("Loaded config from {}", path.display());
            return Ok(config);
        }

        Ok(Config::default())
    }

    // This method provides smart fallbacks when no API key is configured
    pub fn get_api_key(&self) -> Result<String> {
        if let Some(key) = &self.api_key {
            if !key.is_empty() {
                return Ok(key.clone());
            }
        }

        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() {
                return Ok(key);
            }
        }

        Err(JournalError::MissingApiKey)
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = ProjectDirs::from("", "", "lulu-journal")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".lulu-journal"));

        Config {
            data_dir,
            api_key: None,
        }
    }
}
