//! Per-post asset discovery: slideshow images, audio tracks, start offsets.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

/// Raster formats accepted inside slideshow folders, case-insensitive.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "gif"];

/// Audio formats in selection priority order; the first extension with a hit
/// wins and any further matches are ignored.
pub const AUDIO_EXTENSIONS: [&str; 4] = ["mp3", "wav", "ogg", "flac"];

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .is_some_and(|e| extensions.contains(&e.as_str()))
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}

/// Files directly inside `dir`, sorted by name for deterministic selection.
fn folder_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Compares two names by alternating digit/non-digit runs: digit runs as
/// integers, the rest case-insensitively. `img2` sorts before `img10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let runs_a = split_runs(a);
    let runs_b = split_runs(b);

    for (x, y) in runs_a.iter().zip(runs_b.iter()) {
        let ord = match (x.numeric, y.numeric) {
            (true, true) => cmp_digit_runs(x.text, y.text),
            (false, false) => x.text.to_lowercase().cmp(&y.text.to_lowercase()),
            // A digit run sorts ahead of a letter run, as in plain byte order.
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    runs_a.len().cmp(&runs_b.len())
}

struct Run<'a> {
    numeric: bool,
    text: &'a str,
}

fn split_runs(s: &str) -> Vec<Run<'_>> {
    let bytes = s.as_bytes();
    let mut runs = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let numeric = bytes[i].is_ascii_digit();
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() == numeric {
            i += 1;
        }
        runs.push(Run {
            numeric,
            text: &s[start..i],
        });
    }
    runs
}

/// Integer comparison of digit runs without parsing: strip leading zeros,
/// compare magnitudes by length, then digits; original length breaks ties so
/// `007` and `7` stay deterministically ordered.
fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let sa = a.trim_start_matches('0');
    let sb = b.trim_start_matches('0');
    sa.len()
        .cmp(&sb.len())
        .then_with(|| sa.cmp(sb))
        .then_with(|| a.len().cmp(&b.len()))
}

/// Raster images of a slideshow folder in natural order.
pub fn slideshow_images(dir: &Path) -> Vec<PathBuf> {
    let mut images: Vec<PathBuf> = folder_files(dir)
        .into_iter()
        .filter(|p| has_extension(p, &IMAGE_EXTENSIONS))
        .collect();
    images.sort_by(|a, b| natural_cmp(file_name(a), file_name(b)));
    images
}

/// The slideshow's audio track, if any: scan `AUDIO_EXTENSIONS` in priority
/// order and take the first file matching the first extension with a hit.
pub fn audio_track(dir: &Path) -> Option<PathBuf> {
    let files = folder_files(dir);
    for ext in AUDIO_EXTENSIONS {
        if let Some(found) = files.iter().find(|p| has_extension(p, &[ext])) {
            return Some(found.clone());
        }
    }
    None
}

/// Audio start offset in seconds from the folder's `offset.txt`.
/// A missing or unparsable file means playback from the start.
pub fn audio_offset(dir: &Path) -> f64 {
    let path = dir.join("offset.txt");
    let Ok(content) = std::fs::read_to_string(&path) else {
        return 0.0;
    };
    content.trim().parse().unwrap_or_else(|_| {
        warn!(path = ?path, "Unparsable offset file, starting at 0");
        0.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).unwrap();
    }

    #[test]
    fn test_natural_sort_digit_runs() {
        let mut names = vec!["img2.png", "img10.png", "img1.png"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, ["img1.png", "img2.png", "img10.png"]);
    }

    #[test]
    fn test_natural_sort_case_insensitive() {
        let mut names = vec!["B.png", "a.png"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, ["a.png", "B.png"]);
    }

    #[test]
    fn test_natural_sort_leading_zeros() {
        assert_eq!(natural_cmp("img007.png", "img7.png"), Ordering::Greater);
        assert_eq!(natural_cmp("img007.png", "img8.png"), Ordering::Less);
    }

    #[test]
    fn test_natural_sort_prefix() {
        assert_eq!(natural_cmp("img", "img1"), Ordering::Less);
    }

    #[test]
    fn test_slideshow_images_filters_and_orders() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "img10.png");
        touch(dir.path(), "img2.JPG");
        touch(dir.path(), "img1.png");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "track.mp3");

        let images = slideshow_images(dir.path());
        let names: Vec<&str> = images.iter().map(|p| file_name(p)).collect();
        assert_eq!(names, ["img1.png", "img2.JPG", "img10.png"]);
    }

    #[test]
    fn test_slideshow_images_empty_folder() {
        let dir = tempdir().unwrap();
        assert!(slideshow_images(dir.path()).is_empty());
    }

    #[test]
    fn test_audio_track_priority_order() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "song.ogg");
        touch(dir.path(), "song.wav");

        // wav outranks ogg even though ogg sorts first by name.
        let track = audio_track(dir.path()).unwrap();
        assert_eq!(file_name(&track), "song.wav");
    }

    #[test]
    fn test_audio_track_none_without_audio() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "img1.png");
        assert!(audio_track(dir.path()).is_none());
    }

    #[test]
    fn test_audio_offset_parses_and_defaults() {
        let dir = tempdir().unwrap();
        assert_eq!(audio_offset(dir.path()), 0.0);

        std::fs::write(dir.path().join("offset.txt"), "12.5\n").unwrap();
        assert_eq!(audio_offset(dir.path()), 12.5);

        std::fs::write(dir.path().join("offset.txt"), "not a number").unwrap();
        assert_eq!(audio_offset(dir.path()), 0.0);
    }
}
