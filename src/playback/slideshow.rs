//! Slideshow detail playback: a paginated image sequence plus an independent
//! audio track with a one-shot seek to a stored offset.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use image::imageops::FilterType;
use image::DynamicImage;
use tracing::{debug, warn};

use crate::assets;

use super::player::{PlayerFactory, PlayerHandle};

/// Delay before the one-shot audio seek, letting the player buffer first.
pub const SEEK_DELAY: Duration = Duration::from_millis(100);

struct PendingSeek {
    due: Instant,
    position_ms: i64,
}

/// State machine behind a full-screen slideshow detail view.
pub struct SlideshowPlayback {
    images: Vec<PathBuf>,
    index: usize,
    audio: Option<Box<dyn PlayerHandle>>,
    audio_path: Option<PathBuf>,
    pending_seek: Option<PendingSeek>,
    closed: bool,
}

impl SlideshowPlayback {
    /// Opens the slideshow folder: images in natural order, audio (if any
    /// track is found) starting immediately with a deferred seek to the
    /// folder's stored offset. An unopenable track means silent playback.
    pub fn open(factory: &dyn PlayerFactory, folder: &Path, now: Instant) -> Self {
        let images = assets::slideshow_images(folder);
        let offset = assets::audio_offset(folder);

        let mut audio = None;
        let mut audio_path = None;
        let mut pending_seek = None;
        if let Some(track) = assets::audio_track(folder) {
            let mut player = factory.create();
            match player.open(&track) {
                Ok(()) => {
                    player.play();
                    pending_seek = Some(PendingSeek {
                        due: now + SEEK_DELAY,
                        position_ms: (offset * 1000.0) as i64,
                    });
                    audio = Some(player);
                    audio_path = Some(track);
                }
                Err(err) => {
                    warn!(track = ?track, error = %err, "Audio track failed to open, playing silently");
                }
            }
        }

        debug!(
            folder = ?folder,
            images = images.len(),
            audio = audio_path.is_some(),
            "Slideshow opened"
        );

        Self {
            images,
            index: 0,
            audio,
            audio_path,
            pending_seek,
            closed: false,
        }
    }

    pub fn is_open(&self) -> bool {
        !self.closed
    }

    /// Current page as `(index, count)` for the slide caption.
    pub fn page(&self) -> (usize, usize) {
        (self.index, self.images.len())
    }

    /// The playing audio file, for the "now playing" line.
    pub fn audio_track(&self) -> Option<&Path> {
        self.audio_path.as_deref()
    }

    pub fn current_image(&self) -> Option<&Path> {
        self.images.get(self.index).map(PathBuf::as_path)
    }

    /// Advances one slide, clamped at the last image.
    pub fn next(&mut self) {
        if !self.closed && self.index + 1 < self.images.len() {
            self.index += 1;
        }
    }

    /// Steps back one slide, clamped at the first image.
    pub fn prev(&mut self) {
        if !self.closed {
            self.index = self.index.saturating_sub(1);
        }
    }

    /// Fires the deferred audio seek once its delay has elapsed.
    ///
    /// The pending entry is taken before seeking, so the seek runs at most
    /// once; a session torn down first never seeks because close clears the
    /// entry together with the handle.
    pub fn poll(&mut self, now: Instant) {
        if self.pending_seek.as_ref().is_some_and(|p| now >= p.due) {
            if let (Some(pending), Some(audio)) = (self.pending_seek.take(), self.audio.as_mut()) {
                audio.seek(pending.position_ms);
                debug!(position_ms = pending.position_ms, "Audio seek applied");
            }
        }
    }

    /// Re-fits the current slide to a viewport without touching the index.
    /// A missing or undecodable slide degrades to `None`.
    pub fn scaled_current(&self, max_width: u32, max_height: u32) -> Option<DynamicImage> {
        let path = self.images.get(self.index)?;
        match image::open(path) {
            Ok(img) => Some(img.resize(max_width.max(1), max_height.max(1), FilterType::CatmullRom)),
            Err(err) => {
                warn!(path = ?path, error = %err, "Slide failed to decode");
                None
            }
        }
    }

    /// Stops and releases the audio handle.
    ///
    /// The handle is consumed, so release runs at most once; failures are
    /// logged and swallowed. Clearing the pending seek here is what cancels
    /// a not-yet-fired seek on teardown.
    pub fn close(&mut self) {
        self.pending_seek = None;
        if let Some(mut audio) = self.audio.take() {
            audio.stop();
            if let Err(err) = audio.release() {
                warn!(error = %err, "Audio release failed");
            }
        }
        self.closed = true;
    }
}
