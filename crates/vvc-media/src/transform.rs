//! Descriptor resolution: probe once, then build the pure descriptor.

use tracing::debug;

use vvc_models::{ConversionJob, TransformDescriptor};

use crate::error::MediaResult;
use crate::overlay::probe_watermark;
use crate::probe::{probe_video, VideoInfo};

/// Resolve a job's transform descriptor.
///
/// Probes the source geometry and duration exactly once, probes the
/// watermark asset when configured, and delegates to the pure builder. The
/// first failing input aborts the build; callers attribute the error to the
/// job. The probed [`VideoInfo`] is returned alongside so the executor can
/// derive progress fractions without a second probe.
pub async fn resolve_descriptor(
    job: &ConversionJob,
) -> MediaResult<(TransformDescriptor, VideoInfo)> {
    let info = probe_video(&job.source).await?;
    debug!(
        source = %job.source.display(),
        width = info.width,
        height = info.height,
        duration = info.duration,
        "Probed source video"
    );

    let asset_dims = match &job.watermark {
        Some(config) => Some(probe_watermark(&config.asset_path)?),
        None => None,
    };

    let watermark = job
        .watermark
        .as_ref()
        .zip(asset_dims)
        .map(|(config, (w, h))| (config, w, h));

    let descriptor = TransformDescriptor::build(
        info.width,
        info.height,
        job.zoom,
        job.preset,
        watermark,
    )?;

    Ok((descriptor, info))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MediaError;
    use vvc_models::QualityPreset;

    #[tokio::test]
    async fn test_missing_source_fails_before_watermark_probe() {
        let job = ConversionJob::new(
            "/nonexistent/source.mp4",
            "/tmp/out.mp4",
            1.0,
            QualityPreset::High,
            None,
        )
        .unwrap();

        let err = resolve_descriptor(&job).await.unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
