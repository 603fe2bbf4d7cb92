//! Shared data models for the vertical video converter.
//!
//! This crate provides Serde-serializable types and pure functions for:
//! - Crop geometry resolution (source frame -> centered 9:16 crop + zoom)
//! - Quality presets and encoder settings
//! - Watermark configuration and overlay placement
//! - Conversion jobs and their status machine
//! - Transform descriptors (the full, deterministic work description)
//! - Batch events and summaries
//!
//! Nothing in here performs I/O; probing and process execution live in
//! `vvc-media` and `vvc-worker`.

pub mod batch;
pub mod descriptor;
pub mod geometry;
pub mod job;
pub mod preset;
pub mod watermark;

// Re-export common types
pub use batch::{BatchEvent, BatchSummary, JobFailure};
pub use descriptor::TransformDescriptor;
pub use geometry::{CropRect, GeometryError, MAX_ZOOM, MIN_ZOOM, TARGET_HEIGHT, TARGET_WIDTH};
pub use job::{ConversionJob, JobError, JobId, JobStatus};
pub use preset::{EncoderSettings, PresetError, QualityPreset};
pub use watermark::{Anchor, OverlaySpec, WatermarkConfig, WatermarkError, WATERMARK_MARGIN_PX};
