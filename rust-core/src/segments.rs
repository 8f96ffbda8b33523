//! Gradient segmentation: where along a [0, 100] axis a series line must
//! switch between its normal and anomaly colors.
//!
//! The axis is split into `N - 1` equal segments, one per pair of adjacent
//! points. Each segment whose endpoints straddle (or touch) a threshold gets
//! a breakpoint at the linearly interpolated crossing. Colors then alternate
//! at every breakpoint, starting from the classification of the first point.

use crate::anomaly::{field_values, MIN_SAMPLES};
use crate::config::Palette;
use crate::error::{AnomalyError, Result};
use crate::models::{Breakpoint, ClassifiedPoint, GradientStop, SegmentKind, Thresholds};
use tracing::debug;

pub const AXIS_START: f64 = 0.0;
pub const AXIS_END: f64 = 100.0;

fn clamp_offset(offset: f64) -> f64 {
    offset.clamp(AXIS_START, AXIS_END)
}

/// Fraction of the segment `prev -> curr` at which it meets `threshold`.
fn crossing_offset(prev: f64, curr: f64, threshold: f64) -> Option<f64> {
    let crosses =
        (prev - threshold) * (curr - threshold) < 0.0 || prev == threshold || curr == threshold;
    if !crosses {
        return None;
    }
    // flat segment lying on the threshold gives 0/0
    let offset = (threshold - prev) / (curr - prev);
    if !offset.is_finite() || !(0.0..=1.0).contains(&offset) {
        return None;
    }
    Some(offset)
}

/// Axis offsets where `field` crosses either threshold, sorted ascending.
pub fn threshold_crossings(
    points: &[ClassifiedPoint],
    field: &str,
    thresholds: &Thresholds,
) -> Result<Vec<f64>> {
    let values = field_values(points.iter().map(|p| &p.sample), points.len(), field)?;
    let width = (AXIS_END - AXIS_START) / (values.len() - 1) as f64;

    let mut crossings = Vec::new();
    for (i, pair) in values.windows(2).enumerate() {
        let (prev, curr) = (pair[0], pair[1]);
        let segment_start = AXIS_START + i as f64 * width;
        for threshold in [thresholds.high, thresholds.low] {
            if let Some(t) = crossing_offset(prev, curr, threshold) {
                crossings.push(clamp_offset(segment_start + t * width));
            }
        }
    }
    crossings.sort_by(f64::total_cmp);
    debug!(series = field, crossings = crossings.len(), "threshold crossings");
    Ok(crossings)
}

fn first_kind(points: &[ClassifiedPoint], field: &str) -> Result<SegmentKind> {
    if points.len() < MIN_SAMPLES {
        return Err(AnomalyError::InsufficientSamples {
            required: MIN_SAMPLES,
            actual: points.len(),
        });
    }
    points[0]
        .score(field)
        .map(|s| SegmentKind::from_anomaly(s.is_anomaly))
        .ok_or_else(|| AnomalyError::Unclassified {
            index: 0,
            field: field.to_string(),
        })
}

/// Breakpoints for `field`: `{kind, 0}`, then an entry/exit pair per
/// crossing, then `{kind, 100}`. Always `2 + 2 * crossings.len()` long
/// once non-finite crossings are dropped.
pub fn segment_kinds(
    points: &[ClassifiedPoint],
    field: &str,
    crossings: &[f64],
) -> Result<Vec<Breakpoint>> {
    let mut kind = first_kind(points, field)?;

    let mut offsets: Vec<f64> = crossings
        .iter()
        .copied()
        .filter(|c| c.is_finite())
        .map(clamp_offset)
        .collect();
    offsets.sort_by(f64::total_cmp);

    let mut out = Vec::with_capacity(2 + 2 * offsets.len());
    out.push(Breakpoint {
        offset: AXIS_START,
        kind,
    });
    for offset in offsets {
        out.push(Breakpoint { offset, kind });
        kind = kind.flipped();
        out.push(Breakpoint { offset, kind });
    }
    out.push(Breakpoint {
        offset: AXIS_END,
        kind,
    });
    Ok(out)
}

/// Gradient stops for `field` with `palette` colors applied.
pub fn build_segments(
    points: &[ClassifiedPoint],
    field: &str,
    crossings: &[f64],
    palette: &Palette,
) -> Result<Vec<GradientStop>> {
    Ok(segment_kinds(points, field, crossings)?
        .into_iter()
        .map(|b| GradientStop {
            offset: b.offset,
            color: palette.color(b.kind).to_string(),
        })
        .collect())
}

/// Per-point marker color: anomaly color for anomalous points.
pub fn point_colors(points: &[ClassifiedPoint], field: &str, palette: &Palette) -> Result<Vec<String>> {
    points
        .iter()
        .enumerate()
        .map(|(index, p)| {
            p.score(field)
                .map(|s| palette.color(SegmentKind::from_anomaly(s.is_anomaly)).to_string())
                .ok_or_else(|| AnomalyError::Unclassified {
                    index,
                    field: field.to_string(),
                })
        })
        .collect()
}
