//! Batch events and summaries.
//!
//! These are the only types that cross the worker/presentation boundary.
//! The worker publishes them over a channel; the presentation side never
//! calls into the pipeline while a batch is running.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::job::{JobId, JobStatus};

/// One failed job's identity and reason, collected into the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobFailure {
    pub id: JobId,
    pub source: PathBuf,
    pub error: String,
}

/// Final accounting for a batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Total jobs in the batch
    pub total: usize,
    /// Jobs that produced an output file
    pub succeeded: usize,
    /// Jobs cancelled before or during execution
    pub cancelled: usize,
    /// Every failed job with its reason
    pub failures: Vec<JobFailure>,
}

impl BatchSummary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// A batch completes normally even with zero successes; each job is
    /// self-describing.
    pub fn is_fully_successful(&self) -> bool {
        self.succeeded == self.total
    }
}

/// Asynchronous notifications published while a batch runs.
///
/// Per-job notifications for a given job are delivered in lifecycle order;
/// `BatchProgress` fractions are monotonically non-decreasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchEvent {
    /// A job transitioned Pending -> Running.
    JobStarted {
        id: JobId,
        index: usize,
        source: PathBuf,
    },
    /// A running job's progress fraction advanced.
    JobProgress { id: JobId, index: usize, fraction: f64 },
    /// A job reached a terminal state.
    JobFinished {
        id: JobId,
        index: usize,
        status: JobStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// Batch-level progress: completed jobs over total, independent of any
    /// single job's internal progress.
    BatchProgress { completed: usize, total: usize },
    /// The batch finished (normally, cancelled, or aborted).
    BatchFinished { summary: BatchSummary },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_accounting() {
        let summary = BatchSummary {
            total: 3,
            succeeded: 1,
            cancelled: 1,
            failures: vec![JobFailure {
                id: JobId::new(),
                source: "clip.mp4".into(),
                error: "encoder exited with status 1".to_string(),
            }],
        };
        assert_eq!(summary.failed(), 1);
        assert!(!summary.is_fully_successful());
    }

    #[test]
    fn test_event_serialization_tags() {
        let event = BatchEvent::BatchProgress { completed: 2, total: 5 };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"batch_progress\""));
    }
}
