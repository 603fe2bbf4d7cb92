//! Progress/event publication to the presentation boundary.
//!
//! The worker owns all job state; the presentation side only ever receives
//! [`BatchEvent`] snapshots over an unbounded channel. Emission never
//! fails and never blocks: a dropped receiver just means nobody is
//! listening anymore.

use tokio::sync::mpsc;

use vvc_models::{BatchEvent, BatchSummary, ConversionJob, JobId};

/// Non-failing event emitter handed to the executor and orchestrator.
#[derive(Debug, Clone)]
pub struct ProgressSink {
    tx: Option<mpsc::UnboundedSender<BatchEvent>>,
}

impl ProgressSink {
    /// Create a sink and the receiver the presentation side reads.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<BatchEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A sink that drops every event.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    fn emit(&self, event: BatchEvent) {
        if let Some(tx) = &self.tx {
            tx.send(event).ok();
        }
    }

    pub fn job_started(&self, job: &ConversionJob, index: usize) {
        self.emit(BatchEvent::JobStarted {
            id: job.id.clone(),
            index,
            source: job.source.clone(),
        });
    }

    pub fn job_progress(&self, id: &JobId, index: usize, fraction: f64) {
        self.emit(BatchEvent::JobProgress {
            id: id.clone(),
            index,
            fraction,
        });
    }

    pub fn job_finished(&self, job: &ConversionJob, index: usize) {
        self.emit(BatchEvent::JobFinished {
            id: job.id.clone(),
            index,
            status: job.status,
            error: job.error.clone(),
        });
    }

    pub fn batch_progress(&self, completed: usize, total: usize) {
        self.emit(BatchEvent::BatchProgress { completed, total });
    }

    pub fn batch_finished(&self, summary: BatchSummary) {
        self.emit(BatchEvent::BatchFinished { summary });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vvc_models::QualityPreset;

    #[test]
    fn test_events_arrive_in_order() {
        let (sink, mut rx) = ProgressSink::channel();
        let job = ConversionJob::new("a.mp4", "out/a.mp4", 1.0, QualityPreset::High, None)
            .unwrap();

        sink.job_started(&job, 0);
        sink.job_progress(&job.id, 0, 0.5);
        sink.batch_progress(1, 2);

        assert!(matches!(rx.try_recv().unwrap(), BatchEvent::JobStarted { .. }));
        assert!(matches!(
            rx.try_recv().unwrap(),
            BatchEvent::JobProgress { fraction, .. } if (fraction - 0.5).abs() < 1e-9
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            BatchEvent::BatchProgress { completed: 1, total: 2 }
        ));
    }

    #[test]
    fn test_disabled_sink_is_silent() {
        let sink = ProgressSink::disabled();
        sink.batch_progress(1, 1); // must not panic
    }
}
