//! Vertical video converter CLI.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vvc_models::{Anchor, BatchEvent, JobStatus, QualityPreset, WatermarkConfig};
use vvc_worker::{build_jobs, BatchConfig, BatchRunner, JobParams, ProgressSink};

#[derive(Parser)]
#[command(
    name = "vvc",
    about = "Convert videos to 1080x1920 vertical with optional watermark",
    version
)]
struct Cli {
    /// Source video file or folder
    input: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Quality preset (high, medium, low)
    #[arg(short, long, default_value = "high")]
    quality: QualityPreset,

    /// Zoom factor, 1.0 (aspect crop only) to 3.0
    #[arg(short, long, default_value_t = 1.0)]
    zoom: f64,

    /// Watermark image (PNG or JPEG)
    #[arg(long)]
    watermark: Option<PathBuf>,

    /// Watermark opacity, 0.0 to 1.0
    #[arg(long, default_value_t = 0.7)]
    watermark_opacity: f32,

    /// Watermark size in pixels (longest side, 50 to 500)
    #[arg(long, default_value_t = 150)]
    watermark_size: u32,

    /// Watermark corner (bottom-right, bottom-left, top-right, top-left)
    #[arg(long, default_value = "bottom-right")]
    watermark_anchor: Anchor,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "vvc_worker={level},vvc_media={level},vvc_models={level}"
        ))
    });

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    vvc_media::check_ffmpeg().context("FFmpeg is required")?;
    vvc_media::check_ffprobe().context("FFprobe is required")?;

    let config = BatchConfig::from_env();

    let watermark = cli
        .watermark
        .map(|path| {
            WatermarkConfig::new(path, cli.watermark_opacity, cli.watermark_size)
                .map(|c| c.with_anchor(cli.watermark_anchor))
        })
        .transpose()
        .context("invalid watermark settings")?;

    let params = JobParams {
        zoom: cli.zoom,
        preset: cli.quality,
        watermark,
    };
    let mut jobs = build_jobs(&cli.input, &cli.output, &config.output_prefix, &params)
        .context("failed to build job list")?;

    if jobs.is_empty() {
        info!("No supported video files found in {}", cli.input.display());
        return Ok(());
    }
    info!("Queued {} job(s)", jobs.len());

    let runner = BatchRunner::ffmpeg(config);

    let cancel = runner.cancel_handle();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        warn!("Cancellation requested, stopping");
        cancel.cancel();
    });

    let (sink, mut events) = ProgressSink::channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                BatchEvent::JobStarted { index, source, .. } => {
                    info!("[{}] converting {}", index + 1, source.display());
                }
                BatchEvent::JobProgress {
                    index, fraction, ..
                } => {
                    debug!("[{}] {:>3.0}%", index + 1, fraction * 100.0);
                }
                BatchEvent::JobFinished {
                    index,
                    status,
                    error,
                    ..
                } => match status {
                    JobStatus::Failed => {
                        error!("[{}] failed: {}", index + 1, error.unwrap_or_default())
                    }
                    JobStatus::Cancelled => warn!("[{}] cancelled", index + 1),
                    _ => info!("[{}] {}", index + 1, status),
                },
                BatchEvent::BatchProgress { completed, total } => {
                    info!("Batch progress: {}/{}", completed, total);
                }
                BatchEvent::BatchFinished { .. } => {}
            }
        }
    });

    let summary = runner.run(&mut jobs, &sink).await;
    drop(sink);
    printer.await.ok();

    info!(
        "Done: {} succeeded, {} failed, {} cancelled",
        summary.succeeded,
        summary.failed(),
        summary.cancelled
    );
    for failure in &summary.failures {
        error!("{}: {}", failure.source.display(), failure.error);
    }

    if !summary.failures.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
