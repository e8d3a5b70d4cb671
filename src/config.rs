use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::pricing;
use crate::utils;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Overrides the default database location under the platform data dir.
    pub database_path: Option<PathBuf>,
    /// Adapter names to sync; `None` means all registered sources.
    pub enabled_sources: Option<Vec<String>>,
    pub offer_valid_days: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            enabled_sources: None,
            offer_valid_days: pricing::DEFAULT_VALID_DAYS,
        }
    }
}

impl AppConfig {
    pub fn load_default() -> Self {
        Self::load(&utils::config_path())
    }

    pub fn load(path: &PathBuf) -> Self {
        read_config(path).unwrap_or_default()
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(utils::database_path)
    }

    pub fn source_enabled(&self, name: &str) -> bool {
        match &self.enabled_sources {
            Some(enabled) => enabled.iter().any(|entry| entry == name),
            None => true,
        }
    }
}

fn read_config(path: &PathBuf) -> Option<AppConfig> {
    if !path.exists() {
        return None;
    }
    let contents = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(config) => Some(config),
        Err(err) => {
            eprintln!("ignoring malformed config {:?}: {err}", path);
            None
        }
    }
}
