//! Sequential batch orchestration.
//!
//! One worker drives all jobs in list order; the external encoder is
//! resource-intensive, so there is no intra-batch parallelism. One job's
//! failure never aborts the rest; only an unavailable encoder does.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};

use vvc_models::{BatchSummary, ConversionJob, JobFailure, JobStatus};

use crate::config::BatchConfig;
use crate::events::ProgressSink;
use crate::executor::{ExecuteJob, FfmpegJobExecutor};

/// Handle for requesting batch cancellation from another task.
///
/// The flag is one-way: once set it stays set, and subsequent calls are
/// no-ops. Cancellation is best-effort and asynchronous; it takes effect
/// between jobs and, mid-job, by terminating the encoder process. It never
/// retroactively alters completed jobs.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Request cancellation.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Sequential batch runner.
pub struct BatchRunner {
    executor: Arc<dyn ExecuteJob>,
    cancel_tx: Arc<watch::Sender<bool>>,
}

impl BatchRunner {
    /// Create a runner over any executor (tests use stubs here).
    pub fn new(executor: Arc<dyn ExecuteJob>) -> Self {
        let (cancel_tx, _) = watch::channel(false);
        Self {
            executor,
            cancel_tx: Arc::new(cancel_tx),
        }
    }

    /// Create a runner backed by the FFmpeg executor.
    pub fn ffmpeg(config: BatchConfig) -> Self {
        Self::new(Arc::new(FfmpegJobExecutor::new(config)))
    }

    /// Get a cancellation handle for this batch.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            tx: Arc::clone(&self.cancel_tx),
        }
    }

    /// Run every job to a terminal state, or until cancelled.
    ///
    /// Jobs are processed strictly in list order. After each terminal job a
    /// batch-progress event is emitted as completed/total, independent of
    /// any single job's internal progress. The returned summary enumerates
    /// successes, failures with reasons, and cancellations; a batch with
    /// zero successes still completes normally.
    pub async fn run(&self, jobs: &mut [ConversionJob], sink: &ProgressSink) -> BatchSummary {
        let total = jobs.len();
        let mut completed = 0usize;
        let mut fatal: Option<String> = None;

        info!(total, "Starting batch");

        for (index, job) in jobs.iter_mut().enumerate() {
            if let Some(reason) = &fatal {
                job.cancel_with_reason(reason.clone());
                sink.job_finished(job, index);
            } else if *self.cancel_tx.borrow() {
                // Cancelled between jobs: never reaches the executor.
                job.cancel();
                sink.job_finished(job, index);
            } else if let Err(e) = self
                .executor
                .execute(job, index, self.cancel_tx.subscribe(), sink)
                .await
            {
                error!("Batch aborted: {}", e);
                fatal = Some(format!("batch aborted: {}", e));
            }

            completed += 1;
            sink.batch_progress(completed, total);
        }

        let summary = summarize(jobs);
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed(),
            cancelled = summary.cancelled,
            "Batch finished"
        );
        sink.batch_finished(summary.clone());
        summary
    }
}

fn summarize(jobs: &[ConversionJob]) -> BatchSummary {
    let mut summary = BatchSummary {
        total: jobs.len(),
        ..Default::default()
    };

    for job in jobs {
        match job.status {
            JobStatus::Succeeded => summary.succeeded += 1,
            JobStatus::Cancelled => summary.cancelled += 1,
            JobStatus::Failed => summary.failures.push(JobFailure {
                id: job.id.clone(),
                source: job.source.clone(),
                error: job
                    .error
                    .clone()
                    .unwrap_or_else(|| "unknown error".to_string()),
            }),
            // Unreachable after a run; counted nowhere on purpose.
            JobStatus::Pending | JobStatus::Running => {}
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_counts_each_terminal_state() {
        use vvc_models::QualityPreset;

        let mut jobs: Vec<ConversionJob> = (0..3)
            .map(|i| {
                ConversionJob::new(
                    format!("clip{}.mp4", i),
                    format!("out/vertical_clip{}.mp4", i),
                    1.0,
                    QualityPreset::Medium,
                    None,
                )
                .unwrap()
            })
            .collect();

        jobs[0].start();
        jobs[0].succeed();
        jobs[1].start();
        jobs[1].fail("encoder exited with status 1");
        jobs[2].cancel();

        let summary = summarize(&jobs);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.cancelled, 1);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].error, "encoder exited with status 1");
    }
}
