//! Structured job logging utilities.

use std::path::Path;
use tracing::{error, info, warn};

use vvc_models::JobId;

/// Job logger for consistent lifecycle logging with job context.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: String,
    source: String,
}

impl JobLogger {
    /// Create a logger for one job.
    pub fn new(job_id: &JobId, source: &Path) -> Self {
        Self {
            job_id: job_id.to_string(),
            source: source.display().to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            source = %self.source,
            "Job started: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            job_id = %self.job_id,
            source = %self.source,
            "Job warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            job_id = %self.job_id,
            source = %self.source,
            "Job error: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            source = %self.source,
            "Job completed: {}", message
        );
    }
}
