//! Crop geometry resolution.
//!
//! The output frame is always 1080x1920 (9:16). A source of any aspect is
//! reduced to the largest centered rectangle with the target aspect, then
//! tightened by the zoom factor around its center. The resulting rectangle
//! is scaled (never padded) to the target frame.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Output frame width in pixels.
pub const TARGET_WIDTH: u32 = 1080;
/// Output frame height in pixels.
pub const TARGET_HEIGHT: u32 = 1920;

/// Minimum accepted zoom factor (no tightening beyond aspect correction).
pub const MIN_ZOOM: f64 = 1.0;
/// Maximum accepted zoom factor (crop to one-third linear extent).
pub const MAX_ZOOM: f64 = 3.0;

/// Target aspect ratio (width / height).
pub fn target_aspect() -> f64 {
    TARGET_WIDTH as f64 / TARGET_HEIGHT as f64
}

/// Errors from crop resolution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("source dimensions must be positive, got {width}x{height}")]
    NonPositiveSource { width: u32, height: u32 },

    #[error("zoom factor {0} outside [{MIN_ZOOM}, {MAX_ZOOM}]")]
    ZoomOutOfRange(f64),

    #[error("crop rectangle degenerated to {width}x{height} at zoom {zoom}")]
    DegenerateCrop { width: u32, height: u32, zoom: f64 },
}

/// An axis-aligned crop rectangle in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropRect {
    /// X coordinate of the top-left corner
    pub x: u32,
    /// Y coordinate of the top-left corner
    pub y: u32,
    /// Width of the rectangle
    pub width: u32,
    /// Height of the rectangle
    pub height: u32,
}

impl CropRect {
    /// Area in square pixels.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Aspect ratio (width / height).
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Check the rectangle lies fully inside a source frame.
    pub fn fits_within(&self, source_width: u32, source_height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x.saturating_add(self.width) <= source_width
            && self.y.saturating_add(self.height) <= source_height
    }
}

/// Resolve the crop rectangle for a source frame and zoom factor.
///
/// The crop keeps the target aspect by construction: the wider dimension is
/// trimmed to match 9:16, then both sides shrink by `1/zoom` around the
/// rectangle's center. Sides are rounded to the nearest pixel and clamped to
/// the source bounds.
pub fn resolve_crop(
    source_width: u32,
    source_height: u32,
    zoom: f64,
) -> Result<CropRect, GeometryError> {
    if source_width == 0 || source_height == 0 {
        return Err(GeometryError::NonPositiveSource {
            width: source_width,
            height: source_height,
        });
    }
    if !zoom.is_finite() || !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
        return Err(GeometryError::ZoomOutOfRange(zoom));
    }

    let src_w = source_width as f64;
    let src_h = source_height as f64;
    let target = target_aspect();

    // Largest centered rectangle with the target aspect.
    let (base_w, base_h) = if src_w / src_h > target {
        (src_h * target, src_h)
    } else {
        (src_w, src_w / target)
    };

    let width = (base_w / zoom).round() as u32;
    let height = (base_h / zoom).round() as u32;

    if width < 1 || height < 1 {
        return Err(GeometryError::DegenerateCrop {
            width,
            height,
            zoom,
        });
    }

    let width = width.min(source_width);
    let height = height.min(source_height);

    Ok(CropRect {
        x: (source_width - width) / 2,
        y: (source_height - height) / 2,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASPECT_TOLERANCE: f64 = 0.01;

    #[test]
    fn test_wide_source_crops_width() {
        // 3840x1600 at zoom 1.0: crop width = 1600 * (1080/1920) = 900,
        // full height, centered horizontally.
        let crop = resolve_crop(3840, 1600, 1.0).unwrap();
        assert_eq!(crop.width, 900);
        assert_eq!(crop.height, 1600);
        assert_eq!(crop.x, 1470);
        assert_eq!(crop.y, 0);
    }

    #[test]
    fn test_tall_source_crops_height() {
        let crop = resolve_crop(500, 2000, 1.0).unwrap();
        assert_eq!(crop.width, 500);
        assert_eq!(crop.height, 889);
        assert_eq!(crop.x, 0);
        assert_eq!(crop.y, 555);
        assert!((crop.aspect() - target_aspect()).abs() < ASPECT_TOLERANCE);
    }

    #[test]
    fn test_crop_stays_in_bounds_across_aspects_and_zooms() {
        let sources = [
            (3840u32, 1600u32),
            (1920, 1080),
            (1080, 1920),
            (640, 480),
            (720, 1280),
            (4096, 4096),
        ];
        for (w, h) in sources {
            for zoom in [1.0, 1.3, 2.0, 2.7, 3.0] {
                let crop = resolve_crop(w, h, zoom).unwrap();
                assert!(crop.fits_within(w, h), "{}x{} zoom {}", w, h, zoom);
                assert!(
                    (crop.aspect() - target_aspect()).abs() < ASPECT_TOLERANCE,
                    "aspect drift for {}x{} zoom {}",
                    w,
                    h,
                    zoom
                );
            }
        }
    }

    #[test]
    fn test_zoom_strictly_shrinks_area() {
        let mut last_area = u64::MAX;
        for zoom in [1.0, 1.5, 2.0, 2.5, 3.0] {
            let crop = resolve_crop(1920, 1080, zoom).unwrap();
            assert!(crop.area() < last_area, "area did not shrink at zoom {}", zoom);
            last_area = crop.area();
        }
    }

    #[test]
    fn test_zoom_one_is_maximal_centered_crop() {
        let crop = resolve_crop(1920, 1080, 1.0).unwrap();
        // Full height retained, width trimmed to target aspect.
        assert_eq!(crop.height, 1080);
        assert_eq!(crop.width, 608); // 1080 * 0.5625 = 607.5 -> 608
        assert_eq!(crop.y, 0);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            resolve_crop(0, 1080, 1.0),
            Err(GeometryError::NonPositiveSource { .. })
        ));
        assert!(matches!(
            resolve_crop(1920, 0, 1.0),
            Err(GeometryError::NonPositiveSource { .. })
        ));
    }

    #[test]
    fn test_zoom_out_of_range_rejected() {
        assert!(matches!(
            resolve_crop(1920, 1080, 0.5),
            Err(GeometryError::ZoomOutOfRange(_))
        ));
        assert!(matches!(
            resolve_crop(1920, 1080, 3.2),
            Err(GeometryError::ZoomOutOfRange(_))
        ));
        assert!(matches!(
            resolve_crop(1920, 1080, f64::NAN),
            Err(GeometryError::ZoomOutOfRange(_))
        ));
    }

    #[test]
    fn test_tiny_source_degenerates_at_high_zoom() {
        // 1x2 source: the aspect-correct crop is ~1x2, zoom 3 rounds to 0x1.
        assert!(matches!(
            resolve_crop(1, 2, 3.0),
            Err(GeometryError::DegenerateCrop { .. })
        ));
    }
}
