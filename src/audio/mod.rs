pub mod controller;
pub mod rodio_engine;

use crate::types::{HandleId, Millis};
use std::fmt::Debug;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use strum_macros::Display;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayerError {
    /// The source is missing or undecodable, or no output device is available.
    #[error("Unable to load audio: {0}")]
    Load(String),
    /// A transport command was rejected by the engine.
    #[error("Audio engine rejected command: {0}")]
    Engine(String),
}

pub type PlayerResult<T> = Result<T, PlayerError>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub autoplay: bool,
}

/// Engine-side truth pushed to the controller whenever transport state changes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackStatus {
    pub is_buffering: bool,
    pub position_ms: Millis,
    pub duration_ms: Millis,
    pub did_just_finish: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusNotification {
    pub handle_id: HandleId,
    pub status: PlaybackStatus,
}

pub type StatusCallback = Arc<dyn Fn(PlaybackStatus) + Send + Sync>;

#[derive(Debug, Default, Display, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPhase {
    #[default]
    Unloaded,
    Loading,
    Ready,
    Playing,
    Paused,
    Released,
}

pub trait PlayerHandle: Send + Debug {
    fn play(&mut self) -> impl Future<Output = PlayerResult<()>> + Send;
    fn pause(&mut self) -> impl Future<Output = PlayerResult<()>> + Send;
    fn stop(&mut self) -> impl Future<Output = PlayerResult<()>> + Send;
    fn seek_to(&mut self, position_ms: Millis) -> impl Future<Output = PlayerResult<()>> + Send;
    /// Frees decoder and output resources. Calling it more than once is a no-op.
    fn release(&mut self);
}

pub trait AudioEngine: Send + Debug {
    type Handle: PlayerHandle;

    fn load(
        &mut self,
        source: &Path,
        options: LoadOptions,
        notify: StatusCallback,
    ) -> impl Future<Output = PlayerResult<Self::Handle>> + Send;
}
