//! Application wiring: configuration, the gallery context, and the headless
//! engine drive.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use image::GenericImageView;
use tracing::{debug, info, warn};

use crate::catalog::{self, CatalogError};
use crate::gallery::GalleryGrid;
use crate::models::{Post, ProfileInfo};
use crate::playback::{LogPlayerFactory, SEEK_DELAY};
use crate::session::SessionManager;
use crate::thumbnails::{FrameExtractor, ThumbnailCache};

/// Local profile-gallery engine over a flat-file catalog.
#[derive(Debug, Parser)]
#[command(name = "gramview", version, about = "Warm and check a local media gallery")]
pub struct GalleryConfig {
    /// Catalog root directory (profile files, Videos/, Slideshows/).
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Container width the grid is computed for.
    #[arg(long, default_value_t = 1080)]
    pub width: u32,

    /// Frame-extraction binary for video thumbnails.
    #[arg(long, env = "GRAMVIEW_FFMPEG", default_value = "ffmpeg")]
    pub ffmpeg: String,
}

/// Catalog-backed state shared by every component: built once at startup,
/// passed by reference, torn down with the application.
pub struct GalleryContext {
    pub root: PathBuf,
    pub profile: ProfileInfo,
    /// Posts in grid display order (date descending, stable).
    pub posts: Vec<Post>,
    pub posts_count: usize,
}

impl GalleryContext {
    /// Loads the catalog; any malformed entry fails the whole startup.
    pub fn load(root: PathBuf) -> Result<Self, CatalogError> {
        let catalog = catalog::load_catalog(&root)?;
        Ok(Self {
            posts_count: catalog.posts_count(),
            posts: catalog.sorted_posts(),
            profile: catalog.profile,
            root,
        })
    }
}

/// Headless drive of the engine: load the catalog, lay the grid out at the
/// configured width, derive every thumbnail, and smoke the session lifecycle
/// on the first cell.
pub fn run(config: GalleryConfig) -> Result<()> {
    let context = GalleryContext::load(config.root).context("catalog load failed")?;

    info!(
        user = %context.profile.username,
        posts = context.posts_count,
        followers = context.profile.follower_count,
        following = context.profile.following_count,
        links = context.profile.links.len(),
        "Catalog loaded"
    );

    let mut thumbs = ThumbnailCache::new(FrameExtractor::new(config.ffmpeg.as_str()));
    let grid = GalleryGrid::new(context.root.clone(), context.posts.clone());
    let cells = grid.resize(config.width, &mut thumbs);

    for cell in &cells {
        debug!(
            post = %cell.post_id,
            row = cell.position.row,
            col = cell.position.col,
            size = cell.image.width(),
            kind = ?cell.kind,
            "Cell ready"
        );
    }

    if thumbs.degraded_count() > 0 {
        warn!(
            degraded = thumbs.degraded_count(),
            total = cells.len(),
            "Some posts fell back to placeholder thumbnails"
        );
    }

    // Session lifecycle probe against the log player: open, run the deferred
    // audio seek if any, close.
    let mut sessions = SessionManager::new(grid.root(), Box::new(LogPlayerFactory));
    if let Some(activation) = grid.activate(0, &mut sessions) {
        debug!(activation = ?activation, "First cell activated");
        sessions.poll(Instant::now() + SEEK_DELAY);
        if let Some(post) = grid.posts().first() {
            sessions.close(&post.id);
        }
    }

    info!(
        cells = cells.len(),
        degraded = thumbs.degraded_count(),
        width = config.width,
        "Gallery ready"
    );
    Ok(())
}
