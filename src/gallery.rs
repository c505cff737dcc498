//! The posts grid view-model: display-ordered cells, per-width render state,
//! and activation routing through the injected handler.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use tracing::debug;

use crate::layout::{CellPosition, GridLayout};
use crate::models::{Post, PostKind};
use crate::session::{Activation, ActivationHandler};
use crate::thumbnails::ThumbnailCache;

/// Render state for one grid cell at the current width.
pub struct CellRender {
    pub post_id: String,
    pub kind: PostKind,
    pub position: CellPosition,
    /// The memoized square thumbnail rescaled to the cell edge.
    pub image: DynamicImage,
    /// Kind-badge origin in cell-local coordinates.
    pub badge_origin: (i32, i32),
}

/// Grid over posts already in display order.
pub struct GalleryGrid {
    root: PathBuf,
    posts: Vec<Post>,
}

impl GalleryGrid {
    pub fn new(root: impl Into<PathBuf>, posts: Vec<Post>) -> Self {
        Self {
            root: root.into(),
            posts,
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Recomputes render state for a container width.
    ///
    /// Geometry is O(cells); each cell rescales its cached square crop to the
    /// new edge and repositions its badge, nothing is re-derived.
    pub fn resize(&self, width: u32, thumbs: &mut ThumbnailCache) -> Vec<CellRender> {
        let geometry = GridLayout::compute(self.posts.len(), width);
        let badge_origin = GridLayout::badge_origin(geometry.cell_size);
        debug!(
            width,
            cell = geometry.cell_size,
            cells = self.posts.len(),
            "Grid resized"
        );

        self.posts
            .iter()
            .zip(geometry.positions)
            .map(|(post, position)| CellRender {
                post_id: post.id.clone(),
                kind: post.kind,
                position,
                image: thumbs.scaled(post, &self.root, geometry.cell_size),
                badge_origin,
            })
            .collect()
    }

    /// Routes a cell activation to the injected handler. Out-of-range cells
    /// activate nothing.
    pub fn activate(
        &self,
        index: usize,
        handler: &mut dyn ActivationHandler,
    ) -> Option<Activation> {
        self.posts.get(index).map(|post| handler.activate(post))
    }
}
