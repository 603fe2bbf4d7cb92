//! Conversion jobs and their status machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

use crate::geometry::{MAX_ZOOM, MIN_ZOOM};
use crate::preset::QualityPreset;
use crate::watermark::{WatermarkConfig, WatermarkError};

/// Unique identifier for a conversion job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors from job creation. Invalid parameters never reach the pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JobError {
    #[error("zoom factor {0} outside [{MIN_ZOOM}, {MAX_ZOOM}]")]
    ZoomOutOfRange(f64),

    #[error(transparent)]
    Watermark(#[from] WatermarkError),
}

/// Job lifecycle state.
///
/// Transitions are monotonic and one-directional:
/// Pending -> Running -> {Succeeded, Failed, Cancelled}, with the extra
/// edges Pending -> Failed (descriptor building failed before execution)
/// and Pending -> Cancelled (batch cancelled before the job started).
/// There is no transition out of a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Pending,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single source-to-vertical conversion.
///
/// Parameters are validated at construction; status and progress are only
/// mutated through the transition methods, which enforce monotonicity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionJob {
    /// Unique job ID
    pub id: JobId,

    /// Source video path
    pub source: PathBuf,

    /// Output file path
    pub output: PathBuf,

    /// Crop tightening factor, 1.0 to 3.0
    pub zoom: f64,

    /// Output quality level
    pub preset: QualityPreset,

    /// Optional watermark overlay
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark: Option<WatermarkConfig>,

    /// Current lifecycle state
    #[serde(default)]
    pub status: JobStatus,

    /// Completion fraction, 0.0 to 1.0, never regressing
    #[serde(default)]
    pub progress: f64,

    /// Error detail (only for Failed, or Cancelled with a reason)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Execution start timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    /// Terminal-state timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl ConversionJob {
    /// Create a validated job.
    pub fn new(
        source: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        zoom: f64,
        preset: QualityPreset,
        watermark: Option<WatermarkConfig>,
    ) -> Result<Self, JobError> {
        if !zoom.is_finite() || !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
            return Err(JobError::ZoomOutOfRange(zoom));
        }
        if let Some(wm) = &watermark {
            wm.validate()?;
        }

        Ok(Self {
            id: JobId::new(),
            source: source.into(),
            output: output.into(),
            zoom,
            preset,
            watermark,
            status: JobStatus::Pending,
            progress: 0.0,
            error: None,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        })
    }

    /// Source file name for display.
    pub fn name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }

    /// Pending -> Running.
    pub fn start(&mut self) {
        if self.status == JobStatus::Pending {
            self.status = JobStatus::Running;
            self.started_at = Some(Utc::now());
        }
    }

    /// Running -> Succeeded; progress is forced to 1.0.
    pub fn succeed(&mut self) {
        if self.status == JobStatus::Running {
            self.status = JobStatus::Succeeded;
            self.progress = 1.0;
            self.finished_at = Some(Utc::now());
        }
    }

    /// Pending or Running -> Failed, recording the error detail.
    pub fn fail(&mut self, error: impl Into<String>) {
        if !self.status.is_terminal() {
            self.status = JobStatus::Failed;
            self.error = Some(error.into());
            self.finished_at = Some(Utc::now());
        }
    }

    /// Pending or Running -> Cancelled. Not a fault: no error is recorded.
    pub fn cancel(&mut self) {
        if !self.status.is_terminal() {
            self.status = JobStatus::Cancelled;
            self.finished_at = Some(Utc::now());
        }
    }

    /// Pending or Running -> Cancelled with a reason (batch-fatal aborts).
    pub fn cancel_with_reason(&mut self, reason: impl Into<String>) {
        if !self.status.is_terminal() {
            self.status = JobStatus::Cancelled;
            self.error = Some(reason.into());
            self.finished_at = Some(Utc::now());
        }
    }

    /// Update progress while Running. Clamped to [0, 1]; decreasing or
    /// non-finite values are ignored so progress never regresses.
    pub fn set_progress(&mut self, fraction: f64) {
        if self.status != JobStatus::Running || !fraction.is_finite() {
            return;
        }
        let fraction = fraction.clamp(0.0, 1.0);
        if fraction > self.progress {
            self.progress = fraction;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> ConversionJob {
        ConversionJob::new("in.mp4", "out/vertical_in.mp4", 1.0, QualityPreset::High, None)
            .unwrap()
    }

    #[test]
    fn test_zoom_validated_at_creation() {
        assert!(matches!(
            ConversionJob::new("a.mp4", "b.mp4", 0.9, QualityPreset::High, None),
            Err(JobError::ZoomOutOfRange(_))
        ));
        assert!(matches!(
            ConversionJob::new("a.mp4", "b.mp4", 3.5, QualityPreset::High, None),
            Err(JobError::ZoomOutOfRange(_))
        ));
        assert!(ConversionJob::new("a.mp4", "b.mp4", 3.0, QualityPreset::High, None).is_ok());
    }

    #[test]
    fn test_watermark_validated_at_creation() {
        let wm = WatermarkConfig {
            asset_path: "logo.png".into(),
            opacity: 2.0,
            size_px: 150,
            anchor: Default::default(),
        };
        assert!(matches!(
            ConversionJob::new("a.mp4", "b.mp4", 1.0, QualityPreset::High, Some(wm)),
            Err(JobError::Watermark(_))
        ));
    }

    #[test]
    fn test_lifecycle_happy_path() {
        let mut job = job();
        assert_eq!(job.status, JobStatus::Pending);

        job.start();
        assert_eq!(job.status, JobStatus::Running);
        assert!(job.started_at.is_some());

        job.set_progress(0.4);
        job.succeed();
        assert_eq!(job.status, JobStatus::Succeeded);
        assert!((job.progress - 1.0).abs() < f64::EPSILON);
        assert!(job.finished_at.is_some());
    }

    #[test]
    fn test_terminal_states_are_sticky() {
        let mut job = job();
        job.start();
        job.fail("boom");
        assert_eq!(job.status, JobStatus::Failed);

        job.succeed();
        job.cancel();
        job.start();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_pending_can_fail_or_cancel_directly() {
        let mut job = job();
        job.cancel();
        assert_eq!(job.status, JobStatus::Cancelled);
        assert!(job.error.is_none());

        let mut job2 = ConversionJob::new("a.mp4", "b.mp4", 1.0, QualityPreset::Low, None).unwrap();
        job2.fail("no descriptor");
        assert_eq!(job2.status, JobStatus::Failed);
    }

    #[test]
    fn test_progress_is_monotonic_and_clamped() {
        let mut job = job();
        job.start();

        job.set_progress(0.5);
        job.set_progress(0.3); // regression ignored
        assert!((job.progress - 0.5).abs() < f64::EPSILON);

        job.set_progress(7.0); // clamped
        assert!((job.progress - 1.0).abs() < f64::EPSILON);

        job.set_progress(f64::NAN);
        assert!((job.progress - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_ignored_unless_running() {
        let mut job = job();
        job.set_progress(0.5);
        assert_eq!(job.progress, 0.0);
    }
}
