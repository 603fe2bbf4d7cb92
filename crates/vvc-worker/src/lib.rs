//! Batch conversion worker.
//!
//! This crate provides:
//! - The job executor (one FFmpeg run per job, with progress and
//!   cancellation)
//! - The sequential batch orchestrator with a set-once cancellation flag
//! - Progress/event publication to the presentation boundary
//! - Folder scanning and job construction
//! - Env-derived configuration and the `vvc` CLI binary

pub mod config;
pub mod error;
pub mod events;
pub mod executor;
pub mod logging;
pub mod orchestrator;
pub mod scan;

pub use config::BatchConfig;
pub use error::{WorkerError, WorkerResult};
pub use events::ProgressSink;
pub use executor::{ExecuteJob, FfmpegJobExecutor};
pub use logging::JobLogger;
pub use orchestrator::{BatchRunner, CancelHandle};
pub use scan::{build_jobs, scan_directory, JobParams};
