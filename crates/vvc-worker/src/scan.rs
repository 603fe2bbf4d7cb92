//! Input scanning and job construction.

use std::path::{Path, PathBuf};

use vvc_models::{ConversionJob, QualityPreset, WatermarkConfig};

use crate::error::{WorkerError, WorkerResult};

/// Supported source extensions, matched case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "wmv"];

/// Per-job conversion parameters shared across a batch.
#[derive(Debug, Clone)]
pub struct JobParams {
    pub zoom: f64,
    pub preset: QualityPreset,
    pub watermark: Option<WatermarkConfig>,
}

/// Whether a path has a supported video extension.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lower = e.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

/// Collect supported video files directly inside a directory, sorted by
/// file name so batch order is deterministic.
pub fn scan_directory(dir: &Path) -> WorkerResult<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_supported(path))
        .collect();
    files.sort();
    Ok(files)
}

/// Output path for a source: `<output_dir>/<prefix><source file name>`.
pub fn output_path_for(source: &Path, output_dir: &Path, prefix: &str) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.mp4".to_string());
    output_dir.join(format!("{}{}", prefix, name))
}

/// Build the ordered job list for a single file or a whole folder.
///
/// A folder becomes one job per supported file (possibly zero); a file
/// becomes a one-job batch. Parameter validation happens in
/// [`ConversionJob::new`], so invalid zoom or watermark settings are
/// rejected here, before anything reaches the pipeline.
pub fn build_jobs(
    input: &Path,
    output_dir: &Path,
    prefix: &str,
    params: &JobParams,
) -> WorkerResult<Vec<ConversionJob>> {
    if !input.exists() {
        return Err(WorkerError::invalid_input(format!(
            "input path does not exist: {}",
            input.display()
        )));
    }

    let sources = if input.is_dir() {
        scan_directory(input)?
    } else if is_supported(input) {
        vec![input.to_path_buf()]
    } else {
        return Err(WorkerError::invalid_input(format!(
            "unsupported input file: {} (expected one of: {})",
            input.display(),
            SUPPORTED_EXTENSIONS.join(", ")
        )));
    };

    sources
        .into_iter()
        .map(|source| {
            let output = output_path_for(&source, output_dir, prefix);
            ConversionJob::new(
                source,
                output,
                params.zoom,
                params.preset,
                params.watermark.clone(),
            )
            .map_err(WorkerError::from)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> JobParams {
        JobParams {
            zoom: 1.5,
            preset: QualityPreset::Medium,
            watermark: None,
        }
    }

    #[test]
    fn test_extension_filtering() {
        assert!(is_supported(Path::new("clip.mp4")));
        assert!(is_supported(Path::new("CLIP.MKV")));
        assert!(!is_supported(Path::new("notes.txt")));
        assert!(!is_supported(Path::new("noext")));
    }

    #[test]
    fn test_output_naming() {
        let out = output_path_for(
            Path::new("/videos/clip.mp4"),
            Path::new("/out"),
            "vertical_",
        );
        assert_eq!(out, PathBuf::from("/out/vertical_clip.mp4"));
    }

    #[test]
    fn test_folder_scan_is_filtered_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.mp4", "a.MOV", "skip.txt", "c.wmv"] {
            std::fs::File::create(dir.path().join(name)).unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.mp4")).unwrap(); // dir, not a file

        let files = scan_directory(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.MOV", "b.mp4", "c.wmv"]);
    }

    #[test]
    fn test_build_jobs_from_folder() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::File::create(dir.path().join("one.mp4")).unwrap();
        std::fs::File::create(dir.path().join("two.mkv")).unwrap();

        let jobs = build_jobs(dir.path(), Path::new("/out"), "vertical_", &params()).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].output, PathBuf::from("/out/vertical_one.mp4"));
        assert!((jobs[0].zoom - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_build_jobs_rejects_missing_and_unsupported_inputs() {
        assert!(matches!(
            build_jobs(
                Path::new("/nonexistent"),
                Path::new("/out"),
                "vertical_",
                &params()
            ),
            Err(WorkerError::InvalidInput(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("notes.txt");
        std::fs::File::create(&txt).unwrap();
        assert!(matches!(
            build_jobs(&txt, Path::new("/out"), "vertical_", &params()),
            Err(WorkerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_folder_is_an_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        let jobs = build_jobs(dir.path(), Path::new("/out"), "vertical_", &params()).unwrap();
        assert!(jobs.is_empty());
    }
}
