//! Flat-file catalog loading.
//!
//! The catalog root holds profile facts and two post-list files:
//! - `counts.txt` — two integer lines (followers, following)
//! - `user.txt` / `display.txt` / `desc.txt` — single trimmed text fields
//! - `links.txt` — newline-separated URLs
//! - `videos.txt` / `slideshows.txt` — one `id$date:title` line per post
//!
//! Loading is all-or-nothing: a malformed line or unreadable file fails the
//! whole load, before any rendering collaborator starts.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Post, PostKind, ProfileInfo};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}:{line_no}: malformed catalog entry: {line:?}")]
    MalformedEntry {
        path: PathBuf,
        line_no: usize,
        line: String,
    },
    #[error("{path}: expected two integer count lines")]
    MalformedCounts { path: PathBuf },
}

/// The loaded catalog: profile facts plus every post, in merge order
/// (videos first, then slideshows, file order within each list).
#[derive(Debug, Clone)]
pub struct Catalog {
    pub profile: ProfileInfo,
    posts: Vec<Post>,
}

impl Catalog {
    /// Posts in merge order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Total number of posts, shown next to the follower counts.
    pub fn posts_count(&self) -> usize {
        self.posts.len()
    }

    /// Posts in grid display order: date descending. The sort is stable, so
    /// equal dates keep merge order (an implementation-defined tie-break that
    /// tracks how the two list files were generated).
    pub fn sorted_posts(&self) -> Vec<Post> {
        let mut posts = self.posts.clone();
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        posts
    }
}

/// Loads the whole catalog from `root`, failing on the first malformed file.
pub fn load_catalog(root: &Path) -> Result<Catalog, CatalogError> {
    let (follower_count, following_count) = load_counts(&root.join("counts.txt"))?;

    let username = load_text(&root.join("user.txt"))?;
    let display_name = load_text(&root.join("display.txt"))?;
    let description = load_text(&root.join("desc.txt"))?;
    let links = load_text(&root.join("links.txt"))?
        .lines()
        .map(str::to_owned)
        .collect();

    let mut posts = load_posts(&root.join("videos.txt"), PostKind::Video)?;
    posts.extend(load_posts(&root.join("slideshows.txt"), PostKind::Slideshow)?);

    info!(posts = posts.len(), root = ?root, "Catalog loaded");

    Ok(Catalog {
        profile: ProfileInfo {
            username,
            display_name,
            description,
            links,
            follower_count,
            following_count,
        },
        posts,
    })
}

fn read_file(path: &Path) -> Result<String, CatalogError> {
    fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a single UTF-8 text field, trimmed.
fn load_text(path: &Path) -> Result<String, CatalogError> {
    Ok(read_file(path)?.trim().to_owned())
}

/// Reads the follower/following counters.
fn load_counts(path: &Path) -> Result<(u64, u64), CatalogError> {
    let content = read_file(path)?;
    let mut lines = content.lines().map(str::trim);
    let malformed = || CatalogError::MalformedCounts {
        path: path.to_path_buf(),
    };
    let followers = lines
        .next()
        .and_then(|l| l.parse().ok())
        .ok_or_else(malformed)?;
    let following = lines
        .next()
        .and_then(|l| l.parse().ok())
        .ok_or_else(malformed)?;
    Ok((followers, following))
}

/// Parses one `id$date:title` post-list file.
///
/// Trailing blank lines are editor artifacts and are skipped; a blank line
/// between entries has no separators and is malformed like any other
/// separator-less line.
fn load_posts(path: &Path, kind: PostKind) -> Result<Vec<Post>, CatalogError> {
    let content = read_file(path)?;
    let mut posts = Vec::new();

    for (line_no, raw) in content.trim_end().lines().enumerate() {
        let line = raw.trim();
        let entry = line
            .split_once('$')
            .and_then(|(id, rest)| rest.split_once(':').map(|(date, title)| (id, date, title)));
        match entry {
            Some((id, date, title)) => posts.push(Post::new(id, date, title, kind)),
            None => {
                return Err(CatalogError::MalformedEntry {
                    path: path.to_path_buf(),
                    line_no: line_no + 1,
                    line: line.to_owned(),
                })
            }
        }
    }

    debug!(count = posts.len(), path = ?path, "Post list parsed");
    Ok(posts)
}
