//! Watermark asset probing.
//!
//! The pure placement math lives in `vvc_models::watermark`; this module
//! answers the one question that needs the filesystem: what are the asset's
//! pixel dimensions, and is it usable at all.

use std::path::Path;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Accepted watermark image extensions.
const SUPPORTED_ASSET_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Read a watermark asset's dimensions without decoding pixel data.
///
/// Fails when the asset is missing, not PNG/JPEG, unreadable, or has zero
/// area.
pub fn probe_watermark(path: &Path) -> MediaResult<(u32, u32)> {
    if !path.exists() {
        return Err(MediaError::watermark_asset(path, "file not found"));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_ASSET_EXTENSIONS.contains(&extension.as_str()) {
        return Err(MediaError::watermark_asset(
            path,
            format!("unsupported image type .{}", extension),
        ));
    }

    let (width, height) = image::image_dimensions(path)
        .map_err(|e| MediaError::watermark_asset(path, format!("unreadable image: {}", e)))?;

    if width == 0 || height == 0 {
        return Err(MediaError::watermark_asset(
            path,
            format!("zero-area image ({}x{})", width, height),
        ));
    }

    debug!(
        asset = %path.display(),
        width,
        height,
        "Probed watermark asset"
    );
    Ok((width, height))
}
