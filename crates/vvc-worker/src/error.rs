//! Worker error types.

use thiserror::Error;

use vvc_media::MediaError;
use vvc_models::JobError;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("media error: {0}")]
    Media(#[from] MediaError),

    #[error("job error: {0}")]
    Job(#[from] JobError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the whole batch must abort. Only an unavailable encoder
    /// qualifies: no subsequent job can succeed without the binary.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, WorkerError::Media(e) if e.is_spawn_failure())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatality_classification() {
        assert!(WorkerError::Media(MediaError::FfmpegNotFound).is_batch_fatal());
        assert!(!WorkerError::Media(MediaError::Cancelled).is_batch_fatal());
        assert!(!WorkerError::invalid_input("bad path").is_batch_fatal());
    }
}
