//! Z-score outlier classification for chart series and the gradient
//! segmentation that colors anomalous stretches of a line.

mod anomaly;
mod config;
mod error;
mod models;
mod report;
mod segments;
mod stats;

pub use anomaly::{classify, classify_fields, Classification, MIN_SAMPLES};
pub use config::{ClassifierConfig, Palette, MAX_PRECISION};
pub use error::{AnomalyError, Result};
pub use models::{
    Breakpoint, ClassifiedPoint, GradientStop, Sample, SegmentKind, SeriesStatistics, Thresholds,
    ZScore,
};
pub use report::{analyze, demo_fields, demo_palettes, demo_samples, ChartReport, SeriesReport};
pub use segments::{build_segments, point_colors, segment_kinds, threshold_crossings, AXIS_END, AXIS_START};
pub use stats::{mean, round_to, std_dev};
