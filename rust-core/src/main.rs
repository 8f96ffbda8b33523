//! CLI: stdin JSON -> stdout JSON. Logs go to stderr (`RUST_LOG`).
//!
//! Usage:
//!   echo '{"samples":[...], "field":"pv"}' | zscore-segments classify
//!   echo '{"samples":[...], "field":"pv", "palette":{...}}' | zscore-segments segments
//!   echo '{"samples":[...], "fields":["uv","pv"]}' | zscore-segments report
//!   zscore-segments demo
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{env, io};
use tracing_subscriber::EnvFilter;
use zscore_core::{
    analyze, build_segments, classify, demo_fields, demo_palettes, demo_samples, point_colors,
    segment_kinds, threshold_crossings, Breakpoint, ClassifierConfig, GradientStop, Palette,
    Sample, Thresholds,
};

// --- Classify / segments structs ---

#[derive(Debug, Deserialize)]
struct SeriesInput {
    samples: Vec<Sample>,
    field: String,
    #[serde(default)]
    config: ClassifierConfig,
    #[serde(default)]
    palette: Palette,
}

#[derive(Debug, Serialize)]
struct SegmentsOutput {
    thresholds: Thresholds,
    breakpoints: Vec<Breakpoint>,
    stops: Vec<GradientStop>,
    dot_colors: Vec<String>,
}

// --- Report structs ---

#[derive(Debug, Deserialize)]
struct ReportInput {
    samples: Vec<Sample>,
    fields: Vec<String>,
    #[serde(default)]
    config: ClassifierConfig,
    #[serde(default)]
    palettes: BTreeMap<String, Palette>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("report");
    tracing::debug!(command = cmd, "starting");

    match cmd {
        "classify" => {
            let input: SeriesInput =
                serde_json::from_reader(io::stdin()).context("reading classify input")?;
            let classification = classify(&input.samples, &input.field, &input.config)?;
            serde_json::to_writer(io::stdout(), &classification)?;
        }
        "segments" => {
            let input: SeriesInput =
                serde_json::from_reader(io::stdin()).context("reading segments input")?;
            let c = classify(&input.samples, &input.field, &input.config)?;
            let thresholds = c.thresholds();
            let crossings = threshold_crossings(&c.points, &input.field, &thresholds)?;
            let output = SegmentsOutput {
                thresholds,
                breakpoints: segment_kinds(&c.points, &input.field, &crossings)?,
                stops: build_segments(&c.points, &input.field, &crossings, &input.palette)?,
                dot_colors: point_colors(&c.points, &input.field, &input.palette)?,
            };
            serde_json::to_writer(io::stdout(), &output)?;
        }
        "demo" => {
            let report = analyze(
                &demo_samples(),
                &demo_fields(),
                &ClassifierConfig::default(),
                &demo_palettes(),
            )?;
            serde_json::to_writer_pretty(io::stdout(), &report)?;
        }
        "report" => {
            let input: ReportInput =
                serde_json::from_reader(io::stdin()).context("reading report input")?;
            let report = analyze(&input.samples, &input.fields, &input.config, &input.palettes)?;
            serde_json::to_writer(io::stdout(), &report)?;
        }
        other => anyhow::bail!("unknown command `{other}` (expected classify, segments, report or demo)"),
    }
    Ok(())
}
