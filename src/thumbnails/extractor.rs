//! Single-frame extraction through an external process.
//!
//! The derived still lives next to the source video with a `jpg` extension
//! and is reused across runs; the tool is only invoked when the file is
//! missing. The call blocks the calling thread for the duration.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

/// Timestamp of the extracted frame within the source video.
const FRAME_TIMESTAMP: &str = "00:00:01";

/// Soft failures of the extraction step; callers degrade to a placeholder.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("source video missing: {0}")]
    SourceMissing(PathBuf),
    #[error("failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{tool} exited with {status} for {path}")]
    ToolFailed {
        tool: String,
        status: std::process::ExitStatus,
        path: PathBuf,
    },
    #[error("no frame written to {0}")]
    MissingOutput(PathBuf),
}

/// Shells out for one high-quality still per video.
#[derive(Debug, Clone)]
pub struct FrameExtractor {
    tool: String,
}

impl FrameExtractor {
    pub fn new(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }

    /// Expected derived-image path: same base name, image extension.
    pub fn derived_path(video: &Path) -> PathBuf {
        video.with_extension("jpg")
    }

    /// Returns the derived still for `video`, invoking the external tool when
    /// no cached file exists yet.
    pub fn ensure_still(&self, video: &Path) -> Result<PathBuf, ExtractError> {
        let still = Self::derived_path(video);
        if still.exists() {
            return Ok(still);
        }
        if !video.exists() {
            return Err(ExtractError::SourceMissing(video.to_path_buf()));
        }

        debug!(video = ?video, still = ?still, "Extracting video still");
        let status = Command::new(&self.tool)
            .arg("-ss")
            .arg(FRAME_TIMESTAMP)
            .arg("-i")
            .arg(video)
            .arg("-frames:v")
            .arg("1")
            .arg("-q:v")
            .arg("2")
            .arg("-y")
            .arg(&still)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| ExtractError::Spawn {
                tool: self.tool.clone(),
                source,
            })?;

        if !status.success() {
            return Err(ExtractError::ToolFailed {
                tool: self.tool.clone(),
                status,
                path: video.to_path_buf(),
            });
        }
        if !still.exists() {
            return Err(ExtractError::MissingOutput(still));
        }
        Ok(still)
    }
}

impl Default for FrameExtractor {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_derived_path() {
        assert_eq!(
            FrameExtractor::derived_path(Path::new("/g/Videos/a1.mp4")),
            Path::new("/g/Videos/a1.jpg")
        );
    }

    #[test]
    fn test_existing_still_skips_tool() {
        let dir = tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        File::create(&video).unwrap();
        File::create(dir.path().join("clip.jpg")).unwrap();

        // Tool name that cannot exist: reaching it would fail the call.
        let extractor = FrameExtractor::new("gramview-test-no-such-tool");
        let still = extractor.ensure_still(&video).unwrap();
        assert_eq!(still, dir.path().join("clip.jpg"));
    }

    #[test]
    fn test_missing_source_is_soft_error() {
        let dir = tempdir().unwrap();
        let extractor = FrameExtractor::default();
        let err = extractor.ensure_still(&dir.path().join("gone.mp4")).unwrap_err();
        assert!(matches!(err, ExtractError::SourceMissing(_)));
    }

    #[test]
    fn test_unavailable_tool_is_soft_error() {
        let dir = tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        File::create(&video).unwrap();

        let extractor = FrameExtractor::new("gramview-test-no-such-tool");
        let err = extractor.ensure_still(&video).unwrap_err();
        assert!(matches!(err, ExtractError::Spawn { .. }));
    }
}
