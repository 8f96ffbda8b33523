//! Whole pipeline for several series sharing one x axis:
//! samples -> statistics -> classification -> gradient stops.

use crate::anomaly::classify_fields;
use crate::config::{ClassifierConfig, Palette};
use crate::error::{AnomalyError, Result};
use crate::models::{ClassifiedPoint, GradientStop, Sample, SeriesStatistics, Thresholds};
use crate::segments::{build_segments, point_colors, threshold_crossings};
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything a renderer needs to draw one series.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesReport {
    pub field: String,
    pub statistics: SeriesStatistics,
    pub thresholds: Thresholds,
    pub crossings: Vec<f64>,
    pub stops: Vec<GradientStop>,
    pub dot_colors: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartReport {
    pub points: Vec<ClassifiedPoint>,
    pub series: Vec<SeriesReport>,
}

impl ChartReport {
    pub fn series(&self, field: &str) -> Option<&SeriesReport> {
        self.series.iter().find(|s| s.field == field)
    }
}

/// Classify and segment every field in `fields`. Fields without an entry in
/// `palettes` use `Palette::default()`.
pub fn analyze(
    samples: &[Sample],
    fields: &[String],
    config: &ClassifierConfig,
    palettes: &BTreeMap<String, Palette>,
) -> Result<ChartReport> {
    if fields.is_empty() {
        return Err(AnomalyError::InvalidConfig("no fields to analyze".into()));
    }
    let (points, statistics) = classify_fields(samples, fields, config)?;
    let default_palette = Palette::default();

    let mut series = Vec::with_capacity(fields.len());
    for field in fields {
        let stats = statistics[field];
        let thresholds = stats.thresholds();
        let palette = palettes.get(field).unwrap_or(&default_palette);
        let crossings = threshold_crossings(&points, field, &thresholds)?;
        let stops = build_segments(&points, field, &crossings, palette)?;
        let dot_colors = point_colors(&points, field, palette)?;
        series.push(SeriesReport {
            field: field.clone(),
            statistics: stats,
            thresholds,
            crossings,
            stops,
            dot_colors,
        });
    }
    Ok(ChartReport { points, series })
}

/// Seven page-view rows with two series, `uv` and `pv`.
pub fn demo_samples() -> Vec<Sample> {
    [
        ("Page A", 4000.0, 2400.0),
        ("Page B", 3000.0, 1398.0),
        ("Page C", 2000.0, 9800.0),
        ("Page D", 2780.0, 3908.0),
        ("Page E", 1890.0, 4800.0),
        ("Page F", 2390.0, 3800.0),
        ("Page G", 3490.0, 4300.0),
    ]
    .into_iter()
    .map(|(name, uv, pv)| Sample::new(name).with("uv", uv).with("pv", pv))
    .collect()
}

pub fn demo_fields() -> Vec<String> {
    vec!["uv".to_string(), "pv".to_string()]
}

pub fn demo_palettes() -> BTreeMap<String, Palette> {
    BTreeMap::from([
        ("uv".to_string(), Palette::new("#82ca9d", "red")),
        ("pv".to_string(), Palette::new("#8884d8", "red")),
    ])
}
