//! FFmpeg progress parsing.

use serde::{Deserialize, Serialize};

/// Progress information from FFmpeg's `-progress` output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FfmpegProgress {
    /// Current frame number
    pub frame: u64,
    /// Current FPS
    pub fps: f64,
    /// Output time in milliseconds
    pub out_time_ms: i64,
    /// Encoding speed (e.g., 1.5 = 1.5x realtime)
    pub speed: f64,
    /// Whether encoding is complete
    pub is_complete: bool,
}

impl FfmpegProgress {
    /// Completion fraction in [0, 1] given the source duration.
    ///
    /// Unknown or non-positive durations yield 0.0; out-of-range values are
    /// clamped so callers can feed the result straight into a job's
    /// monotonic progress field.
    pub fn fraction(&self, total_duration_ms: i64) -> f64 {
        if total_duration_ms <= 0 || self.out_time_ms <= 0 {
            return 0.0;
        }
        (self.out_time_ms as f64 / total_duration_ms as f64).clamp(0.0, 1.0)
    }
}

/// Callback type for progress updates.
pub type ProgressCallback = Box<dyn Fn(FfmpegProgress) + Send + 'static>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction() {
        let progress = FfmpegProgress {
            out_time_ms: 5_000,
            ..Default::default()
        };

        assert!((progress.fraction(10_000) - 0.5).abs() < 1e-9);
        assert!((progress.fraction(5_000) - 1.0).abs() < 1e-9);
        // Encoder can report slightly past the end; clamp.
        assert!((progress.fraction(4_000) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fraction_defensive_on_unknown_duration() {
        let progress = FfmpegProgress {
            out_time_ms: 5_000,
            ..Default::default()
        };
        assert_eq!(progress.fraction(0), 0.0);
        assert_eq!(progress.fraction(-1), 0.0);
    }
}
