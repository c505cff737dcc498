//! Detail-session ownership: at most one live full-screen view per post.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, warn};

use crate::models::{Post, PostKind};
use crate::playback::{PlayerFactory, SlideshowPlayback, VideoPlayback};

/// The playback machine behind one full-screen detail view.
pub enum DetailSession {
    Video(VideoPlayback),
    Slideshow(SlideshowPlayback),
}

impl DetailSession {
    pub fn is_open(&self) -> bool {
        match self {
            DetailSession::Video(v) => v.is_open(),
            DetailSession::Slideshow(s) => s.is_open(),
        }
    }

    /// Synchronous teardown; runs to completion before the session counts as
    /// gone.
    pub fn close(&mut self) {
        match self {
            DetailSession::Video(v) => v.close(),
            DetailSession::Slideshow(s) => s.close(),
        }
    }

    fn poll(&mut self, now: Instant) {
        if let DetailSession::Slideshow(s) = self {
            s.poll(now);
        }
    }
}

/// Outcome of a cell activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// A new detail session was constructed.
    Opened,
    /// The existing live session was brought to the foreground.
    Foregrounded,
    /// The session could not be constructed; the post stays inactive.
    Failed,
}

/// Capability a grid cell activates through, injected at construction so no
/// widget-hierarchy walk is ever needed.
pub trait ActivationHandler {
    fn activate(&mut self, post: &Post) -> Activation;
}

/// Owns every detail session, one slot per post.
pub struct SessionManager {
    root: PathBuf,
    factory: Box<dyn PlayerFactory>,
    sessions: HashMap<String, DetailSession>,
}

impl SessionManager {
    pub fn new(root: impl Into<PathBuf>, factory: Box<dyn PlayerFactory>) -> Self {
        Self {
            root: root.into(),
            factory,
            sessions: HashMap::new(),
        }
    }

    /// Whether a live session exists for the post.
    pub fn is_active(&self, post_id: &str) -> bool {
        self.sessions.get(post_id).is_some_and(DetailSession::is_open)
    }

    pub fn live_sessions(&self) -> usize {
        self.sessions.values().filter(|s| s.is_open()).count()
    }

    pub fn session(&self, post_id: &str) -> Option<&DetailSession> {
        self.sessions.get(post_id)
    }

    pub fn session_mut(&mut self, post_id: &str) -> Option<&mut DetailSession> {
        self.sessions.get_mut(post_id)
    }

    /// Closes the session for `post_id`. The slot is cleared before teardown
    /// runs, so the post can be reactivated even if release fails.
    pub fn close(&mut self, post_id: &str) {
        if let Some(mut session) = self.sessions.remove(post_id) {
            session.close();
            debug!(post = post_id, "Detail session closed");
        }
    }

    /// Drives deferred work of live sessions (the slideshows' one-shot audio
    /// seeks).
    pub fn poll(&mut self, now: Instant) {
        for session in self.sessions.values_mut() {
            session.poll(now);
        }
    }
}

impl ActivationHandler for SessionManager {
    /// Opens a detail view for `post`, or foregrounds the live one. A slot
    /// holding a closed session is replaced outright.
    fn activate(&mut self, post: &Post) -> Activation {
        if self.is_active(&post.id) {
            debug!(post = %post.id, "Foregrounding live detail session");
            return Activation::Foregrounded;
        }

        let media = post.media_path(&self.root);
        let session = match post.kind {
            PostKind::Video => match VideoPlayback::open(self.factory.as_ref(), &media) {
                Ok(video) => DetailSession::Video(video),
                Err(err) => {
                    warn!(post = %post.id, error = %err, "Video detail failed to open");
                    return Activation::Failed;
                }
            },
            PostKind::Slideshow => DetailSession::Slideshow(SlideshowPlayback::open(
                self.factory.as_ref(),
                &media,
                Instant::now(),
            )),
        };

        self.sessions.insert(post.id.clone(), session);
        debug!(post = %post.id, "Detail session opened");
        Activation::Opened
    }
}
