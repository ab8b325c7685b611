use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codec::PayloadPolicy;
use crate::error::Result;
use crate::render::GridStyle;

/// Application settings, read from an optional JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Board size used when nothing else is given
    pub default_width: i32,
    pub default_height: i32,
    /// Where the store keeps its files
    pub data_dir: PathBuf,
    pub grid: GridStyle,
    pub payload_policy: PayloadPolicy,
    /// Seconds between autosaves of a changed board
    pub autosave_secs: u64,
    pub window_width: u32,
    pub window_height: u32,
    /// Frame color around the board
    pub background: [u8; 4],
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_width: 20,
            default_height: 20,
            data_dir: PathBuf::from("pixboard-data"),
            grid: GridStyle::default(),
            payload_policy: PayloadPolicy::Reject,
            autosave_secs: 60,
            window_width: 1024,
            window_height: 768,
            background: [15, 15, 15, 255],
        }
    }
}

impl Config {
    /// Load a config file, or the defaults when `path` does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        let json = fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }
}
