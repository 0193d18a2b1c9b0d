use anyhow::Context;
use inventory_framework::dispatch::DispatcherConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Playground settings, stored as JSON in `~/.inventory-framework/config.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaygroundConfig {
    /// Menu file to host; the built-in demo menu is used when unset
    #[serde(default)]
    pub menu_path: Option<String>,
    /// Milliseconds between host ticks
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
    /// Log file name inside the config directory
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_tick_rate_ms() -> u64 {
    50
}

fn default_log_file() -> String {
    "playground.log".to_string()
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            menu_path: None,
            tick_rate_ms: default_tick_rate_ms(),
            dispatcher: DispatcherConfig::default(),
            log_file: default_log_file(),
        }
    }
}

impl PlaygroundConfig {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".inventory-framework"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Read the config file; `Ok(None)` when there is none yet
    pub fn load() -> anyhow::Result<Option<PlaygroundConfig>> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Option<PlaygroundConfig>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(Some(config))
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(&self.log_file))
    }
}
