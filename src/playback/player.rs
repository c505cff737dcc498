//! The opaque player capability the playback machines drive.
//!
//! Handles are exclusively owned by one machine for that machine's lifetime;
//! no other component holds or mutates them.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Failure to open or drive a player.
#[derive(Debug, Error)]
#[error("player error: {0}")]
pub struct PlayerError(pub String);

/// Failure while releasing a player's underlying resources.
///
/// Callers log and discard this; teardown never propagates it.
#[derive(Debug, Error)]
#[error("failed to release player: {0}")]
pub struct ReleaseError(pub String);

/// Opaque media playback capability.
pub trait PlayerHandle {
    fn open(&mut self, path: &Path) -> Result<(), PlayerError>;
    fn play(&mut self);
    fn pause(&mut self);
    fn is_playing(&self) -> bool;
    fn seek(&mut self, position_ms: i64);
    fn stop(&mut self);
    fn release(&mut self) -> Result<(), ReleaseError>;
}

/// Creates fresh player handles for detail sessions.
pub trait PlayerFactory {
    fn create(&self) -> Box<dyn PlayerHandle>;
}

/// Tracing-only player backing the headless binary.
#[derive(Debug, Default)]
pub struct LogPlayer {
    path: Option<PathBuf>,
    playing: bool,
}

impl PlayerHandle for LogPlayer {
    fn open(&mut self, path: &Path) -> Result<(), PlayerError> {
        debug!(path = ?path, "player open");
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn seek(&mut self, position_ms: i64) {
        debug!(path = ?self.path, position_ms, "player seek");
    }

    fn stop(&mut self) {
        self.playing = false;
    }

    fn release(&mut self) -> Result<(), ReleaseError> {
        debug!(path = ?self.path, "player release");
        self.path = None;
        Ok(())
    }
}

/// Factory for [`LogPlayer`] handles.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPlayerFactory;

impl PlayerFactory for LogPlayerFactory {
    fn create(&self) -> Box<dyn PlayerHandle> {
        Box::<LogPlayer>::default()
    }
}
