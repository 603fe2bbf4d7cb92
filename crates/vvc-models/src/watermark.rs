//! Watermark configuration and overlay placement.
//!
//! The compositor is pure: given the asset's dimensions, the requested size
//! and opacity, and the target frame, it emits an [`OverlaySpec`] describing
//! where the watermark goes and how it blends. Reading the asset from disk
//! is `vvc-media`'s job.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Fixed margin between the watermark and the frame edge, in pixels.
pub const WATERMARK_MARGIN_PX: u32 = 24;

/// Minimum requested watermark size (longest side), in pixels.
pub const MIN_SIZE_PX: u32 = 50;
/// Maximum requested watermark size (longest side), in pixels.
pub const MAX_SIZE_PX: u32 = 500;

/// Default watermark opacity.
pub const DEFAULT_OPACITY: f32 = 0.7;

/// Errors from watermark configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WatermarkError {
    #[error("watermark opacity {0} outside [0.0, 1.0]")]
    OpacityOutOfRange(f32),

    #[error("watermark size {0}px outside [{MIN_SIZE_PX}, {MAX_SIZE_PX}]")]
    SizeOutOfRange(u32),

    #[error("unknown watermark anchor: {0}")]
    UnknownAnchor(String),
}

/// Corner the watermark is anchored to, with a fixed margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl Anchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Anchor::BottomRight => "bottom-right",
            Anchor::BottomLeft => "bottom-left",
            Anchor::TopRight => "top-right",
            Anchor::TopLeft => "top-left",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Anchor {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "bottom-right" => Ok(Anchor::BottomRight),
            "bottom-left" => Ok(Anchor::BottomLeft),
            "top-right" => Ok(Anchor::TopRight),
            "top-left" => Ok(Anchor::TopLeft),
            other => Err(WatermarkError::UnknownAnchor(other.to_string())),
        }
    }
}

/// Watermark parameters attached to a job. Immutable once attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkConfig {
    /// Path to the watermark image (PNG or JPEG)
    pub asset_path: PathBuf,
    /// Opacity (0.0 = invisible, 1.0 = fully opaque)
    pub opacity: f32,
    /// Requested size of the longest side, in pixels
    pub size_px: u32,
    /// Corner placement
    pub anchor: Anchor,
}

impl WatermarkConfig {
    /// Create a validated configuration with the default anchor.
    pub fn new(
        asset_path: impl Into<PathBuf>,
        opacity: f32,
        size_px: u32,
    ) -> Result<Self, WatermarkError> {
        let config = Self {
            asset_path: asset_path.into(),
            opacity,
            size_px,
            anchor: Anchor::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the anchor corner.
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Check opacity and size domains.
    pub fn validate(&self) -> Result<(), WatermarkError> {
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(WatermarkError::OpacityOutOfRange(self.opacity));
        }
        if !(MIN_SIZE_PX..=MAX_SIZE_PX).contains(&self.size_px) {
            return Err(WatermarkError::SizeOutOfRange(self.size_px));
        }
        Ok(())
    }
}

/// Resolved overlay placement and blend parameters within the target frame.
///
/// Carries the asset path so a transform descriptor stays self-contained:
/// encoder arguments are derived from the descriptor alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlaySpec {
    /// Watermark image path
    pub asset_path: PathBuf,
    /// Top-left X offset in the target frame
    pub x: u32,
    /// Top-left Y offset in the target frame
    pub y: u32,
    /// Scaled watermark width
    pub width: u32,
    /// Scaled watermark height
    pub height: u32,
    /// Linear blend factor
    pub opacity: f32,
}

impl OverlaySpec {
    /// Reference blend: `opacity * watermark + (1 - opacity) * background`
    /// per channel. The encoder performs the actual pixel math; this is the
    /// contract it is asked to implement.
    pub fn blend(&self, watermark: f64, background: f64) -> f64 {
        let opacity = self.opacity as f64;
        opacity * watermark + (1.0 - opacity) * background
    }
}

/// Scale asset dimensions so the longest side equals `size_px`, preserving
/// aspect. Sides never round below 1.
pub fn scale_to_fit(asset_width: u32, asset_height: u32, size_px: u32) -> (u32, u32) {
    let w = asset_width.max(1) as f64;
    let h = asset_height.max(1) as f64;
    let scale = size_px as f64 / w.max(h);
    (
        ((w * scale).round() as u32).max(1),
        ((h * scale).round() as u32).max(1),
    )
}

/// Place a watermark inside the target frame.
///
/// The asset is resized via [`scale_to_fit`] and offset from the configured
/// anchor by [`WATERMARK_MARGIN_PX`]. Offsets saturate at the frame origin
/// when the scaled watermark is larger than the available space.
pub fn place_overlay(
    config: &WatermarkConfig,
    asset_width: u32,
    asset_height: u32,
    frame_width: u32,
    frame_height: u32,
) -> OverlaySpec {
    let (width, height) = scale_to_fit(asset_width, asset_height, config.size_px);
    let right = frame_width.saturating_sub(width + WATERMARK_MARGIN_PX);
    let bottom = frame_height.saturating_sub(height + WATERMARK_MARGIN_PX);

    let (x, y) = match config.anchor {
        Anchor::BottomRight => (right, bottom),
        Anchor::BottomLeft => (WATERMARK_MARGIN_PX, bottom),
        Anchor::TopRight => (right, WATERMARK_MARGIN_PX),
        Anchor::TopLeft => (WATERMARK_MARGIN_PX, WATERMARK_MARGIN_PX),
    };

    OverlaySpec {
        asset_path: config.asset_path.clone(),
        x,
        y,
        width,
        height,
        opacity: config.opacity,
    }
}
