//! Worker configuration.

use std::time::Duration;

/// Batch worker configuration.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Timeout for a single FFmpeg run
    pub ffmpeg_timeout: Duration,
    /// Prefix prepended to output file names
    pub output_prefix: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            ffmpeg_timeout: Duration::from_secs(600),
            output_prefix: "vertical_".to_string(),
        }
    }
}

impl BatchConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            ffmpeg_timeout: Duration::from_secs(
                std::env::var("VVC_FFMPEG_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(600),
            ),
            output_prefix: std::env::var("VVC_OUTPUT_PREFIX")
                .unwrap_or_else(|_| "vertical_".to_string()),
        }
    }
}
