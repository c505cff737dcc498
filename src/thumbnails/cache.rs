//! Square thumbnail derivation and the computed-once-per-run crop memo.
//!
//! Video posts resolve through the external frame extractor and its durable
//! sibling file; slideshow posts take the naturally-first image of their
//! folder. Every failure degrades to a shared placeholder so one broken post
//! never aborts the gallery render.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::{debug, warn};

use crate::assets;
use crate::models::{Post, PostKind};

use super::extractor::{ExtractError, FrameExtractor};

/// Side length of the shared placeholder square.
const PLACEHOLDER_SIDE: u32 = 16;

/// Placeholder fill shade, a dark neutral.
const PLACEHOLDER_SHADE: u8 = 0x26;

static PLACEHOLDER: Lazy<DynamicImage> = Lazy::new(|| {
    let shade = Rgba([PLACEHOLDER_SHADE, PLACEHOLDER_SHADE, PLACEHOLDER_SHADE, 0xff]);
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        PLACEHOLDER_SIDE,
        PLACEHOLDER_SIDE,
        shade,
    ))
});

/// Per-post soft failures; the cache resolves all of them to the placeholder.
#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("no images in slideshow folder {0}")]
    EmptyFolder(PathBuf),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("undecodable image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Largest centered square of a `width x height` image: floor semantics for
/// both the origin and the side.
pub fn center_crop_rect(width: u32, height: u32) -> (u32, u32, u32) {
    let side = width.min(height);
    ((width - side) / 2, (height - side) / 2, side)
}

fn crop_to_square(img: &DynamicImage) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return PLACEHOLDER.clone();
    }
    if width == height {
        return img.clone();
    }
    let (x, y, side) = center_crop_rect(width, height);
    img.crop_imm(x, y, side, side)
}

/// Square preview images keyed by post id.
///
/// The crop is computed once per post per run and never recomputed, even
/// when derivation failed; a broken post is probed exactly once. The derived
/// on-disk still is additionally reused across runs.
pub struct ThumbnailCache {
    extractor: FrameExtractor,
    crops: HashMap<String, DynamicImage>,
    degraded: HashSet<String>,
}

impl ThumbnailCache {
    pub fn new(extractor: FrameExtractor) -> Self {
        Self {
            extractor,
            crops: HashMap::new(),
            degraded: HashSet::new(),
        }
    }

    /// The memoized square crop for `post`, derived on first access.
    pub fn square(&mut self, post: &Post, root: &Path) -> &DynamicImage {
        if !self.crops.contains_key(&post.id) {
            let square = match self.derive(post, root) {
                Ok(img) => crop_to_square(&img),
                Err(err) => {
                    warn!(post = %post.id, error = %err, "Thumbnail derivation failed, using placeholder");
                    self.degraded.insert(post.id.clone());
                    PLACEHOLDER.clone()
                }
            };
            debug!(post = %post.id, side = square.width(), "Thumbnail crop cached");
            self.crops.insert(post.id.clone(), square);
        }
        &self.crops[&post.id]
    }

    /// The square crop rescaled to `cell x cell` for the current layout pass.
    /// Only the rescale runs per pass; the crop itself is never recomputed.
    pub fn scaled(&mut self, post: &Post, root: &Path, cell_size: u32) -> DynamicImage {
        let cell = cell_size.max(1);
        self.square(post, root)
            .resize_exact(cell, cell, FilterType::CatmullRom)
    }

    /// Whether the post's preview fell back to the placeholder this run.
    pub fn is_degraded(&self, post_id: &str) -> bool {
        self.degraded.contains(post_id)
    }

    /// Number of posts that degraded to the placeholder this run.
    pub fn degraded_count(&self) -> usize {
        self.degraded.len()
    }

    fn derive(&self, post: &Post, root: &Path) -> Result<DynamicImage, ThumbnailError> {
        let media = post.media_path(root);
        let source = match post.kind {
            PostKind::Video => self.extractor.ensure_still(&media)?,
            PostKind::Slideshow => assets::slideshow_images(&media)
                .into_iter()
                .next()
                .ok_or(ThumbnailError::EmptyFolder(media))?,
        };
        Ok(image::open(&source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use tempfile::tempdir;

    fn cache_without_tool() -> ThumbnailCache {
        ThumbnailCache::new(FrameExtractor::new("gramview-test-no-such-tool"))
    }

    fn save_image(path: &Path, width: u32, height: u32) {
        RgbImage::from_pixel(width, height, image::Rgb([10, 200, 30]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_center_crop_rect_landscape() {
        assert_eq!(center_crop_rect(200, 100), (50, 0, 100));
    }

    #[test]
    fn test_center_crop_rect_portrait() {
        assert_eq!(center_crop_rect(100, 200), (0, 50, 100));
    }

    #[test]
    fn test_center_crop_rect_floors_odd_margins() {
        assert_eq!(center_crop_rect(201, 100), (50, 0, 100));
        assert_eq!(center_crop_rect(100, 203), (0, 51, 100));
    }

    #[test]
    fn test_crop_to_square_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(200, 100));
        let square = crop_to_square(&img);
        assert_eq!(square.dimensions(), (100, 100));
    }

    #[test]
    fn test_slideshow_square_from_first_image() {
        let root = tempdir().unwrap();
        let folder = root.path().join("Slideshows").join("s1");
        std::fs::create_dir_all(&folder).unwrap();
        save_image(&folder.join("img2.png"), 80, 40);
        save_image(&folder.join("img10.png"), 60, 60);

        let post = Post::new("s1", "2024-01-01", "set", PostKind::Slideshow);
        let mut cache = cache_without_tool();

        // img2 is naturally first; its 80x40 frame center-crops to 40x40.
        let square = cache.square(&post, root.path());
        assert_eq!(square.dimensions(), (40, 40));
        assert!(!cache.is_degraded("s1"));
    }

    #[test]
    fn test_video_square_from_derived_still() {
        let root = tempdir().unwrap();
        let videos = root.path().join("Videos");
        std::fs::create_dir_all(&videos).unwrap();
        std::fs::File::create(videos.join("v1.mp4")).unwrap();
        save_image(&videos.join("v1.jpg"), 120, 90);

        let post = Post::new("v1", "2024-01-01", "clip", PostKind::Video);
        let mut cache = cache_without_tool();

        let square = cache.square(&post, root.path());
        assert_eq!(square.dimensions(), (90, 90));
    }

    #[test]
    fn test_broken_post_degrades_and_later_posts_load() {
        let root = tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("Videos")).unwrap();
        let folder = root.path().join("Slideshows").join("ok");
        std::fs::create_dir_all(&folder).unwrap();
        save_image(&folder.join("a.png"), 50, 50);

        let broken = Post::new("gone", "2024-01-01", "clip", PostKind::Video);
        let fine = Post::new("ok", "2024-01-02", "set", PostKind::Slideshow);
        let mut cache = cache_without_tool();

        let placeholder = cache.square(&broken, root.path()).clone();
        assert_eq!(placeholder.dimensions(), (PLACEHOLDER_SIDE, PLACEHOLDER_SIDE));
        assert!(cache.is_degraded("gone"));

        let square = cache.square(&fine, root.path());
        assert_eq!(square.dimensions(), (50, 50));
        assert_eq!(cache.degraded_count(), 1);
    }

    #[test]
    fn test_empty_slideshow_folder_degrades() {
        let root = tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("Slideshows").join("s0")).unwrap();

        let post = Post::new("s0", "2024-01-01", "empty", PostKind::Slideshow);
        let mut cache = cache_without_tool();
        cache.square(&post, root.path());
        assert!(cache.is_degraded("s0"));
    }

    #[test]
    fn test_scaled_output_is_exact_cell_square() {
        let root = tempdir().unwrap();
        let folder = root.path().join("Slideshows").join("s1");
        std::fs::create_dir_all(&folder).unwrap();
        save_image(&folder.join("a.png"), 90, 30);

        let post = Post::new("s1", "2024-01-01", "set", PostKind::Slideshow);
        let mut cache = cache_without_tool();

        for cell in [1, 7, 333, 360] {
            let scaled = cache.scaled(&post, root.path(), cell);
            assert_eq!(scaled.dimensions(), (cell, cell));
        }

        // A degraded placeholder still scales to the requested cell.
        let broken = Post::new("nope", "2024-01-01", "clip", PostKind::Video);
        let scaled = cache.scaled(&broken, root.path(), 128);
        assert_eq!(scaled.dimensions(), (128, 128));
    }
}
