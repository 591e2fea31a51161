use crate::types::AppResult;
use anyhow::anyhow;
use directories;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    path::{Path, PathBuf},
};

pub static CONFIG_FILENAME: &str = "config.json";
pub static LOG_FILENAME: &str = "player.log";

pub const DEFAULT_SOURCE: &str = "assets/sample.mp3";
pub const DEFAULT_TARGET_FPS: u8 = 20;
pub const DEFAULT_SEEK_STEP_SECONDS: u64 = 5;
pub const MAX_SEEK_STEP_SECONDS: u64 = 3_600;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub source: PathBuf,
    pub target_fps: u8,
    pub seek_step_seconds: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            target_fps: DEFAULT_TARGET_FPS,
            seek_step_seconds: DEFAULT_SEEK_STEP_SECONDS,
        }
    }
}

pub fn store_path(filename: &str) -> AppResult<PathBuf> {
    let dirs = directories::ProjectDirs::from("org", "frittura", "tiny-player")
        .ok_or(anyhow!("Failed to get directories"))?;
    let config_dirs = dirs.config_dir();
    if !config_dirs.exists() {
        std::fs::create_dir_all(config_dirs)?;
    }
    let path = config_dirs.join(filename);
    Ok(path)
}

/// Loads the config at `path`, falling back to defaults if the file is missing.
pub fn load_config_from(path: &Path) -> AppResult<PlayerConfig> {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(PlayerConfig::default());
    }
    load_from_json(path)
}

pub fn load_config() -> AppResult<PlayerConfig> {
    load_config_from(&store_path(CONFIG_FILENAME)?)
}

pub fn save_config_to(path: &Path, config: &PlayerConfig) -> AppResult<()> {
    let file = File::create(path)?;
    let buffer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(buffer, config)?;
    Ok(())
}

fn load_from_json<T: for<'a> Deserialize<'a>>(path: &Path) -> AppResult<T> {
    let file = File::open(path)?;
    let data: T = serde_json::from_reader(file)?;
    Ok(data)
}
