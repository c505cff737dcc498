use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostKind {
    Video,
    Slideshow,
}

/// A single gallery entry. Immutable once loaded from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub date: String,
    pub title: String,
    pub kind: PostKind,
}

impl Post {
    pub fn new(
        id: impl Into<String>,
        date: impl Into<String>,
        title: impl Into<String>,
        kind: PostKind,
    ) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            title: title.into(),
            kind,
        }
    }

    /// Check if this post opens as a video detail view
    pub fn is_video(&self) -> bool {
        self.kind == PostKind::Video
    }

    /// On-disk media location under the catalog root:
    /// `Videos/{id}.mp4` for videos, the `Slideshows/{id}/` folder otherwise.
    pub fn media_path(&self, root: &Path) -> PathBuf {
        match self.kind {
            PostKind::Video => root.join("Videos").join(format!("{}.mp4", self.id)),
            PostKind::Slideshow => root.join("Slideshows").join(&self.id),
        }
    }
}
