//! DashRoute extraction binary.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use droute_cli::config::{parse_region, RunConfig};
use droute_cli::processor::process_video;
use droute_models::{ExtractionStatus, VideoItem};
use droute_ocr::{RecognitionAccuracy, TesseractRecognizer};

/// Extract GPS tracks from dashcam footage with an on-screen coordinate
/// overlay.
#[derive(Debug, Parser)]
#[command(name = "droute", version)]
struct Cli {
    /// Input video files
    #[arg(required = true)]
    videos: Vec<PathBuf>,

    /// Write a GeoJSON FeatureCollection to this path
    #[arg(long)]
    geojson: Option<PathBuf>,

    /// Write a per-frame CSV to this path
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Sampling interval in seconds
    #[arg(long)]
    interval: Option<f64>,

    /// Overlay region: a preset (full, overlay, top-left, ...) or x,y,w,h
    #[arg(long)]
    region: Option<String>,

    /// Recognition language
    #[arg(long)]
    language: Option<String>,

    /// Favor recognition throughput over quality
    #[arg(long)]
    fast: bool,

    /// Smoothing window size (0 disables smoothing)
    #[arg(long)]
    smooth_window: Option<usize>,

    /// Simplify the track with this minimum distance in meters
    #[arg(long)]
    simplify: Option<f64>,

    /// OCR worker pool size
    #[arg(long)]
    max_concurrency: Option<usize>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("droute=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(false))
            .with(env_filter)
            .init();
    }

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        error!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = apply_overrides(RunConfig::from_env(), &cli)?;
    info!("Run config: {:?}", config);

    let recognizer =
        Arc::new(TesseractRecognizer::new().context("recognition engine unavailable")?);

    // Videos are processed one at a time; a failure on one never affects
    // the rest of the batch.
    let mut items = Vec::with_capacity(cli.videos.len());
    for video in &cli.videos {
        let item = process_video(VideoItem::new(video), &config, recognizer.clone()).await;
        if item.status == ExtractionStatus::Error {
            error!(
                video = %item.name,
                "{}",
                item.error_message.as_deref().unwrap_or("extraction error")
            );
        }
        items.push(item);
    }

    let completed = items
        .iter()
        .filter(|i| i.status == ExtractionStatus::Completed)
        .count();
    info!("Processed {} videos, {} with routes", items.len(), completed);

    if let Some(path) = &cli.geojson {
        droute_export::export_geojson(path, &items)
            .await
            .context("GeoJSON export failed")?;
    }
    if let Some(path) = &cli.csv {
        droute_export::export_csv(path, &items)
            .await
            .context("CSV export failed")?;
    }

    Ok(())
}

/// Apply CLI flags on top of the environment-derived config.
fn apply_overrides(mut config: RunConfig, cli: &Cli) -> anyhow::Result<RunConfig> {
    if let Some(interval) = cli.interval {
        anyhow::ensure!(interval > 0.0, "--interval must be positive");
        config.interval_secs = interval;
    }
    if let Some(region) = &cli.region {
        config.region = parse_region(region)
            .with_context(|| format!("invalid region {:?}", region))?;
    }
    if let Some(language) = &cli.language {
        config.language = language.clone();
    }
    if cli.fast {
        config.accuracy = RecognitionAccuracy::Fast;
    }
    if let Some(window) = cli.smooth_window {
        config.smooth_window = window;
    }
    if cli.simplify.is_some() {
        config.simplify_threshold = cli.simplify;
    }
    if let Some(max) = cli.max_concurrency {
        anyhow::ensure!(max > 0, "--max-concurrency must be positive");
        config.max_concurrency = max;
    }
    Ok(config)
}
