//! Job execution against the external encoder.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::watch;

use vvc_media::{build_command, resolve_descriptor, FfmpegRunner};
use vvc_models::ConversionJob;

use crate::config::BatchConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::events::ProgressSink;
use crate::logging::JobLogger;

/// Seam between the orchestrator and the encoder invocation.
#[async_trait]
pub trait ExecuteJob: Send + Sync {
    /// Drive one job to a terminal state.
    ///
    /// Per-job failures are recorded on the job and return `Ok`; an error
    /// return means the batch cannot continue (encoder unavailable).
    async fn execute(
        &self,
        job: &mut ConversionJob,
        index: usize,
        cancel_rx: watch::Receiver<bool>,
        sink: &ProgressSink,
    ) -> WorkerResult<()>;
}

/// Executor that runs one FFmpeg process per job.
pub struct FfmpegJobExecutor {
    config: BatchConfig,
}

impl FfmpegJobExecutor {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ExecuteJob for FfmpegJobExecutor {
    async fn execute(
        &self,
        job: &mut ConversionJob,
        index: usize,
        cancel_rx: watch::Receiver<bool>,
        sink: &ProgressSink,
    ) -> WorkerResult<()> {
        let logger = JobLogger::new(&job.id, &job.source);

        // Descriptor building aborts the job before the encoder is touched.
        let (descriptor, info) = match resolve_descriptor(job).await {
            Ok(resolved) => resolved,
            Err(e) => {
                let detail = e.detail();
                logger.log_error(&detail);
                job.fail(detail);
                sink.job_finished(job, index);
                return Ok(());
            }
        };

        if let Some(parent) = job.output.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = tokio::fs::create_dir_all(parent).await {
                    let detail =
                        format!("cannot create output directory {}: {}", parent.display(), e);
                    logger.log_error(&detail);
                    job.fail(detail);
                    sink.job_finished(job, index);
                    return Ok(());
                }
            }
        }

        job.start();
        sink.job_started(job, index);
        logger.log_start(&format!(
            "{}x{} -> {}x{}, zoom {:.1}, preset {}",
            info.width,
            info.height,
            descriptor.scale_width,
            descriptor.scale_height,
            job.zoom,
            job.preset
        ));

        let cmd = build_command(&descriptor, &job.source, &job.output);

        // Progress flows from the parser task through the sink; the shared
        // cell carries the last fraction back into the job afterwards.
        let duration_ms = info.duration_ms();
        let last_fraction = Arc::new(Mutex::new(0.0_f64));
        let cb_fraction = Arc::clone(&last_fraction);
        let cb_sink = sink.clone();
        let cb_id = job.id.clone();

        let runner = FfmpegRunner::new()
            .with_cancel(cancel_rx)
            .with_timeout(self.config.ffmpeg_timeout);

        let result = runner
            .run_with_progress(&cmd, move |progress| {
                let fraction = progress.fraction(duration_ms);
                let Ok(mut last) = cb_fraction.lock() else {
                    return;
                };
                if fraction > *last {
                    *last = fraction;
                    cb_sink.job_progress(&cb_id, index, fraction);
                }
            })
            .await;

        if let Ok(last) = last_fraction.lock() {
            job.set_progress(*last);
        }

        match result {
            Ok(()) => {
                job.succeed();
                logger.log_completion(&format!("wrote {}", job.output.display()));
            }
            Err(e) if e.is_cancelled() => {
                job.cancel();
                logger.log_warning("cancelled while encoding");
            }
            Err(e) if e.is_spawn_failure() => {
                let detail = e.detail();
                logger.log_error(&detail);
                job.fail(detail);
                sink.job_finished(job, index);
                return Err(WorkerError::Media(e));
            }
            Err(e) => {
                // Partial output is left in place for diagnostics.
                let detail = e.detail();
                logger.log_error(&detail);
                job.fail(detail);
            }
        }

        sink.job_finished(job, index);
        Ok(())
    }
}
