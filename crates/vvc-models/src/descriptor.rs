//! Transform descriptors.
//!
//! A [`TransformDescriptor`] is the full, side-effect-free description of
//! one job's work: crop rectangle, scale target, encoder settings, and the
//! optional overlay. It is derived deterministically from the job's
//! parameters plus the probed source and asset dimensions, and never
//! mutated afterwards; a parameter change means a rebuild.

use serde::{Deserialize, Serialize};

use crate::geometry::{resolve_crop, CropRect, GeometryError, TARGET_HEIGHT, TARGET_WIDTH};
use crate::preset::{EncoderSettings, QualityPreset};
use crate::watermark::{place_overlay, OverlaySpec, WatermarkConfig};

/// Fully resolved description of one conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformDescriptor {
    /// Crop rectangle in source coordinates
    pub crop: CropRect,
    /// Scale target width (always 1080)
    pub scale_width: u32,
    /// Scale target height (always 1920)
    pub scale_height: u32,
    /// Encoder parameters from the quality preset
    pub encoder: EncoderSettings,
    /// Optional watermark overlay placement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<OverlaySpec>,
}

impl TransformDescriptor {
    /// Build a descriptor from job parameters and probed dimensions.
    ///
    /// Pure and deterministic: identical inputs always yield an identical
    /// descriptor. `watermark` carries the validated config together with
    /// the asset's probed pixel dimensions.
    pub fn build(
        source_width: u32,
        source_height: u32,
        zoom: f64,
        preset: QualityPreset,
        watermark: Option<(&WatermarkConfig, u32, u32)>,
    ) -> Result<Self, GeometryError> {
        let crop = resolve_crop(source_width, source_height, zoom)?;

        let overlay = watermark.map(|(config, asset_w, asset_h)| {
            place_overlay(config, asset_w, asset_h, TARGET_WIDTH, TARGET_HEIGHT)
        });

        Ok(Self {
            crop,
            scale_width: TARGET_WIDTH,
            scale_height: TARGET_HEIGHT,
            encoder: preset.settings(),
            overlay,
        })
    }

    /// Whether this descriptor composites a watermark.
    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_is_deterministic() {
        let config = WatermarkConfig::new("logo.png", 0.7, 150).unwrap();
        let a = TransformDescriptor::build(3840, 1600, 1.5, QualityPreset::High, Some((&config, 100, 50)))
            .unwrap();
        let b = TransformDescriptor::build(3840, 1600, 1.5, QualityPreset::High, Some((&config, 100, 50)))
            .unwrap();
        assert_eq!(a, b);

        let json_a = serde_json::to_string(&a).unwrap();
        let json_b = serde_json::to_string(&b).unwrap();
        assert_eq!(json_a, json_b);
    }

    #[test]
    fn test_scale_target_is_fixed() {
        let d = TransformDescriptor::build(1920, 1080, 1.0, QualityPreset::Medium, None).unwrap();
        assert_eq!(d.scale_width, 1080);
        assert_eq!(d.scale_height, 1920);
        assert!(!d.has_overlay());
    }

    #[test]
    fn test_geometry_failure_propagates() {
        assert!(matches!(
            TransformDescriptor::build(0, 1080, 1.0, QualityPreset::High, None),
            Err(GeometryError::NonPositiveSource { .. })
        ));
    }
}
