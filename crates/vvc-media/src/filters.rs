//! Filter-graph and command derivation from a transform descriptor.
//!
//! A descriptor fully determines the FFmpeg invocation: the crop/scale
//! chain, the optional overlay branch, and the encoder arguments. Nothing
//! here touches the filesystem.

use std::path::Path;

use vvc_models::{OverlaySpec, TransformDescriptor};

use crate::command::FfmpegCommand;

/// Crop and scale chain for the primary video stream.
pub fn build_video_filter(descriptor: &TransformDescriptor) -> String {
    let crop = &descriptor.crop;
    format!(
        "crop={}:{}:{}:{},scale={}:{}:flags={}",
        crop.width,
        crop.height,
        crop.x,
        crop.y,
        descriptor.scale_width,
        descriptor.scale_height,
        descriptor.encoder.scale_flags
    )
}

/// Full filter complex when a watermark is composited.
///
/// The overlay branch resizes the asset, applies opacity through the alpha
/// channel (skipped at full opacity, where the watermark passes through
/// unmodified), and overlays at the resolved position.
pub fn build_filter_complex(descriptor: &TransformDescriptor) -> Option<String> {
    let overlay = descriptor.overlay.as_ref()?;
    Some(overlay_chain(descriptor, overlay))
}

fn overlay_chain(descriptor: &TransformDescriptor, overlay: &OverlaySpec) -> String {
    let base = build_video_filter(descriptor);
    let flags = &descriptor.encoder.scale_flags;

    if overlay.opacity < 1.0 {
        format!(
            "[0:v]{base}[base];\
             [1:v]scale={w}:{h}:flags={flags},format=rgba,colorchannelmixer=aa={opacity:.2}[wm];\
             [base][wm]overlay={x}:{y}[outv]",
            w = overlay.width,
            h = overlay.height,
            opacity = overlay.opacity,
            x = overlay.x,
            y = overlay.y,
        )
    } else {
        format!(
            "[0:v]{base}[base];\
             [1:v]scale={w}:{h}:flags={flags}[wm];\
             [base][wm]overlay={x}:{y}[outv]",
            w = overlay.width,
            h = overlay.height,
            x = overlay.x,
            y = overlay.y,
        )
    }
}

/// Derive the complete FFmpeg command for one job from its descriptor.
///
/// Pure: identical descriptors and paths always produce identical argument
/// lists.
pub fn build_command(
    descriptor: &TransformDescriptor,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> FfmpegCommand {
    let cmd = FfmpegCommand::new(input, output);

    let cmd = match &descriptor.overlay {
        Some(overlay) => cmd
            .extra_input(&overlay.asset_path)
            .filter_complex(overlay_chain(descriptor, overlay))
            .map("[outv]")
            .map("0:a?"),
        None => cmd.video_filter(build_video_filter(descriptor)),
    };

    cmd.output_args(descriptor.encoder.to_output_args())
}
