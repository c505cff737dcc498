//! Video detail playback: one media handle with a play/pause toggle.

use std::path::Path;

use tracing::{debug, warn};

use super::player::{PlayerError, PlayerFactory, PlayerHandle};

/// Video playback states. No transition leaves `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoState {
    Playing,
    Paused,
    Closed,
}

/// State machine behind a full-screen video detail view.
pub struct VideoPlayback {
    player: Option<Box<dyn PlayerHandle>>,
    state: VideoState,
}

impl VideoPlayback {
    /// Opens `path` and starts playing immediately.
    pub fn open(factory: &dyn PlayerFactory, path: &Path) -> Result<Self, PlayerError> {
        let mut player = factory.create();
        player.open(path)?;
        player.play();
        debug!(path = ?path, "Video playback started");
        Ok(Self {
            player: Some(player),
            state: VideoState::Playing,
        })
    }

    pub fn state(&self) -> VideoState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != VideoState::Closed
    }

    pub fn is_playing(&self) -> bool {
        self.player.as_ref().is_some_and(|p| p.is_playing())
    }

    /// Play/pause toggle from a click or the designated key. No-op once
    /// closed.
    pub fn toggle(&mut self) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        self.state = match self.state {
            VideoState::Playing => {
                player.pause();
                VideoState::Paused
            }
            VideoState::Paused => {
                player.play();
                VideoState::Playing
            }
            VideoState::Closed => VideoState::Closed,
        };
    }

    /// Stops playback and releases the handle.
    ///
    /// The handle is consumed, so release runs at most once no matter how
    /// often close is called; a release failure is logged and swallowed.
    pub fn close(&mut self) {
        if let Some(mut player) = self.player.take() {
            player.stop();
            if let Err(err) = player.release() {
                warn!(error = %err, "Video player release failed");
            }
        }
        self.state = VideoState::Closed;
    }
}
