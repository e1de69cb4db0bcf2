use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const CONFIG_ENV: &str = "DAGSORT_CONFIG";

// ======================================================
// CONFIG STRUCT
// ======================================================

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Human,
    Json,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub output: OutputMode,

    #[serde(default = "default_color")]
    pub color: bool,

    #[serde(default)]
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputMode::Human,
            color: default_color(),
            verbose: false,
        }
    }
}

fn default_color() -> bool {
    true
}

/// Partial update applied by `dagsort config set`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigUpdate {
    pub output: Option<OutputMode>,
    pub color: Option<bool>,
    pub verbose: Option<bool>,
}

impl Config {
    pub fn apply(&mut self, update: ConfigUpdate) {
        if let Some(output) = update.output {
            self.output = output;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(verbose) = update.verbose {
            self.verbose = verbose;
        }
    }
}

// ======================================================
// PATH
// ======================================================

/// `$DAGSORT_CONFIG`, else `~/.dagsort/config.json`.
pub fn config_path() -> Result<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".dagsort").join("config.json"))
}

// ======================================================
// LOAD / SAVE / RESET
// ======================================================

/// A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

pub fn save_config_to(path: &Path, config: &Config) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config dir {}", dir.display()))?;
        }
    }

    let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(path, json)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;

    debug!(path = %path.display(), "config saved");
    Ok(())
}

pub fn reset_config_at(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)
            .with_context(|| format!("Failed to delete config file {}", path.display()))?;
    }

    Ok(())
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn save_config(config: &Config) -> Result<()> {
    save_config_to(&config_path()?, config)
}

pub fn reset_config() -> Result<()> {
    reset_config_at(&config_path()?)
}
