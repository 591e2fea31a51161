use crate::store::{load_config, load_config_from, PlayerConfig, MAX_SEEK_STEP_SECONDS};
use crate::types::{parse_time, AppResult, Millis};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[clap(name="Tiny player", about = "Play one audio track in your terminal", author, version, long_about = None)]
pub struct AppArgs {
    #[clap(long, short = 's', action=ArgAction::Set, help = "Audio file to play")]
    pub source: Option<PathBuf>,
    #[clap(long, action=ArgAction::Set, value_parser = parse_time, help = "Seek to M:SS once loaded")]
    pub start_at: Option<Millis>,
    #[clap(long, action=ArgAction::Set, value_parser = clap::value_parser!(u8).range(1..), help = "Set target FPS")]
    pub target_fps: Option<u8>,
    #[clap(long, action=ArgAction::Set, value_parser = clap::value_parser!(u64).range(1..=MAX_SEEK_STEP_SECONDS), help = "Seconds skipped by the arrow keys")]
    pub seek_step: Option<u64>,
    #[clap(long, short = 'c', action=ArgAction::Set, help = "Read config from this file")]
    pub config: Option<PathBuf>,
    #[clap(long, action=ArgAction::SetTrue, help = "Write the effective config and exit")]
    pub save_config: bool,
    #[clap(long, short = 'v', action=ArgAction::SetTrue, help = "Enable debug logging")]
    pub verbose: bool,
}

impl AppArgs {
    /// Config file values with command line overrides applied on top.
    pub fn resolve_config(&self) -> AppResult<PlayerConfig> {
        let config = match self.config.as_ref() {
            Some(path) => load_config_from(path)?,
            None => load_config()?,
        };
        Ok(self.apply(config))
    }

    pub fn apply(&self, mut config: PlayerConfig) -> PlayerConfig {
        if let Some(source) = self.source.as_ref() {
            config.source = source.clone();
        }
        if let Some(fps) = self.target_fps {
            config.target_fps = fps;
        }
        if let Some(step) = self.seek_step {
            config.seek_step_seconds = step;
        }
        config
    }
}
