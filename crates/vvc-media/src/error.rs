//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

use vvc_models::GeometryError;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while probing or encoding.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("failed to spawn FFmpeg: {0}")]
    FfmpegSpawn(String),

    #[error("FFmpeg failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("FFprobe failed: {message}")]
    FfprobeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("watermark asset {path}: {reason}")]
    WatermarkAsset { path: PathBuf, reason: String },

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("invalid video file: {0}")]
    InvalidVideo(String),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("operation cancelled")]
    Cancelled,

    #[error("operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl MediaError {
    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create a watermark asset error.
    pub fn watermark_asset(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::WatermarkAsset {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the encoder itself could not be started. The batch treats
    /// these as fatal: no subsequent job can succeed without the binary.
    pub fn is_spawn_failure(&self) -> bool {
        matches!(self, MediaError::FfmpegNotFound | MediaError::FfmpegSpawn(_))
    }

    /// Whether this error is a cancellation rather than a fault.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, MediaError::Cancelled)
    }

    /// Human-readable detail including the encoder's last diagnostic output.
    pub fn detail(&self) -> String {
        match self {
            MediaError::FfmpegFailed {
                message,
                stderr: Some(stderr),
                exit_code,
            } => {
                let code = exit_code
                    .map(|c| format!(" (exit code {})", c))
                    .unwrap_or_default();
                format!("{}{}: {}", message, code, stderr.trim())
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_failure_classification() {
        assert!(MediaError::FfmpegNotFound.is_spawn_failure());
        assert!(MediaError::FfmpegSpawn("permission denied".into()).is_spawn_failure());
        assert!(!MediaError::Cancelled.is_spawn_failure());
        assert!(!MediaError::ffmpeg_failed("boom", None, Some(1)).is_spawn_failure());
    }

    #[test]
    fn test_detail_includes_stderr() {
        let err = MediaError::ffmpeg_failed(
            "FFmpeg exited with non-zero status",
            Some("Invalid data found when processing input\n".to_string()),
            Some(1),
        );
        let detail = err.detail();
        assert!(detail.contains("exit code 1"));
        assert!(detail.contains("Invalid data"));
    }
}
