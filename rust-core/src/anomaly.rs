//! Z-score outlier classification over a whole chart series.

use crate::config::ClassifierConfig;
use crate::error::{AnomalyError, Result};
use crate::models::{ClassifiedPoint, Sample, SeriesStatistics, Thresholds, ZScore};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Segmentation divides the axis into `len - 1` segments.
pub const MIN_SAMPLES: usize = 2;

/// One field classified across every sample.
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub field: String,
    pub statistics: SeriesStatistics,
    pub points: Vec<ClassifiedPoint>,
}

impl Classification {
    pub fn thresholds(&self) -> Thresholds {
        self.statistics.thresholds()
    }

    pub fn anomaly_indices(&self) -> Vec<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.score(&self.field).is_some_and(|s| s.is_anomaly))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Extract `field` from every sample, failing on short, missing or non-finite input.
pub(crate) fn field_values<'a, I>(rows: I, len: usize, field: &str) -> Result<Vec<f64>>
where
    I: IntoIterator<Item = &'a Sample>,
{
    if len < MIN_SAMPLES {
        return Err(AnomalyError::InsufficientSamples {
            required: MIN_SAMPLES,
            actual: len,
        });
    }
    rows.into_iter()
        .enumerate()
        .map(|(index, s)| match s.value(field) {
            None => Err(AnomalyError::MissingField {
                index,
                field: field.to_string(),
            }),
            Some(v) if !v.is_finite() => Err(AnomalyError::NonFiniteValue {
                index,
                field: field.to_string(),
            }),
            Some(v) => Ok(v),
        })
        .collect()
}

/// Z-scores of `values` against `stats`. A constant series (zero std dev)
/// scores 0.0 everywhere and has no anomalies.
fn score_values(values: &[f64], stats: &SeriesStatistics, z_threshold: f64) -> Vec<ZScore> {
    if stats.std_dev <= 0.0 {
        return values
            .iter()
            .map(|_| ZScore {
                z_score: 0.0,
                is_anomaly: false,
            })
            .collect();
    }
    values
        .iter()
        .map(|v| {
            let z = (v - stats.mean) / stats.std_dev;
            ZScore {
                z_score: z,
                is_anomaly: z.abs() > z_threshold,
            }
        })
        .collect()
}

fn score_field(
    samples: &[Sample],
    field: &str,
    config: &ClassifierConfig,
) -> Result<(SeriesStatistics, Vec<ZScore>)> {
    let values = field_values(samples, samples.len(), field)?;
    let stats = SeriesStatistics::compute(&values, config.precision)?;
    if stats.std_dev <= 0.0 {
        warn!(series = field, mean = stats.mean, "constant series, no point is anomalous");
    }
    let scores = score_values(&values, &stats, config.z_threshold);
    debug!(
        series = field,
        mean = stats.mean,
        std_dev = stats.std_dev,
        high = stats.threshold_high,
        low = stats.threshold_low,
        anomalies = scores.iter().filter(|s| s.is_anomaly).count(),
        "classified series"
    );
    Ok((stats, scores))
}

/// Classify every sample of `field` by its z-score over the full sequence.
pub fn classify(samples: &[Sample], field: &str, config: &ClassifierConfig) -> Result<Classification> {
    config.validate()?;
    let (statistics, scores) = score_field(samples, field, config)?;
    let points = samples
        .iter()
        .zip(scores)
        .map(|(sample, score)| ClassifiedPoint {
            sample: sample.clone(),
            scores: BTreeMap::from([(field.to_string(), score)]),
        })
        .collect();
    Ok(Classification {
        field: field.to_string(),
        statistics,
        points,
    })
}

/// Classify several fields over the same samples. Each point carries the
/// scores of every field; statistics are returned per field.
pub fn classify_fields(
    samples: &[Sample],
    fields: &[String],
    config: &ClassifierConfig,
) -> Result<(Vec<ClassifiedPoint>, BTreeMap<String, SeriesStatistics>)> {
    config.validate()?;
    let mut points: Vec<ClassifiedPoint> = samples
        .iter()
        .map(|sample| ClassifiedPoint {
            sample: sample.clone(),
            scores: BTreeMap::new(),
        })
        .collect();
    let mut statistics = BTreeMap::new();

    for field in fields {
        let (stats, scores) = score_field(samples, field, config)?;
        for (point, score) in points.iter_mut().zip(scores) {
            point.scores.insert(field.clone(), score);
        }
        statistics.insert(field.clone(), stats);
    }
    Ok((points, statistics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::demo_samples;
    use approx::assert_abs_diff_eq;

    fn series(field: &str, vals: &[f64]) -> Vec<Sample> {
        vals.iter()
            .enumerate()
            .map(|(i, v)| Sample::new(format!("P{i}")).with(field, *v))
            .collect()
    }

    #[test]
    fn test_pv_example() {
        let c = classify(&demo_samples(), "pv", &ClassifierConfig::default()).unwrap();
        assert_abs_diff_eq!(c.statistics.mean, 4343.714285714285, epsilon = 1e-9);
        assert_eq!(c.thresholds().high, 6819.94);
        assert_eq!(c.thresholds().low, 1867.49);
        assert_eq!(c.anomaly_indices(), vec![1, 2]);
        let z2 = c.points[2].score("pv").unwrap();
        assert!(z2.is_anomaly);
        assert!(z2.z_score > 2.0);
    }

    #[test]
    fn test_is_anomaly_iff_abs_z_above_one() {
        let samples = series("x", &[1.0, 2.0, 3.0, 10.0, -6.0, 2.5]);
        let c = classify(&samples, "x", &ClassifierConfig::default()).unwrap();
        for p in &c.points {
            let s = p.score("x").unwrap();
            assert_eq!(s.is_anomaly, s.z_score.abs() > 1.0);
            let v = p.value("x").unwrap();
            assert_eq!(s.z_score > 0.0, v > c.statistics.mean);
        }
    }

    #[test]
    fn test_constant_series_has_no_anomalies() {
        let samples = series("x", &[7.0, 7.0, 7.0, 7.0]);
        let c = classify(&samples, "x", &ClassifierConfig::default()).unwrap();
        assert_eq!(c.statistics.std_dev, 0.0);
        assert!(c.anomaly_indices().is_empty());
        assert!(c.points.iter().all(|p| p.score("x").unwrap().z_score == 0.0));
    }

    #[test]
    fn test_inexact_constant_series_has_no_anomalies() {
        for v in [0.1, 1.1] {
            let samples = series("x", &[v; 7]);
            for z_threshold in [1.0, 0.5] {
                let cfg = ClassifierConfig {
                    z_threshold,
                    precision: 2,
                };
                let c = classify(&samples, "x", &cfg).unwrap();
                assert_eq!(c.statistics.std_dev, 0.0);
                assert!(c.anomaly_indices().is_empty());
                assert!(c.points.iter().all(|p| p.score("x").unwrap().z_score == 0.0));
            }
        }
    }

    #[test]
    fn test_overflowing_series_fails() {
        let samples = series("x", &[1e308, 1e308, -1e308]);
        let err = classify(&samples, "x", &ClassifierConfig::default()).unwrap_err();
        assert!(matches!(err, AnomalyError::NonFiniteStatistic(_)));
    }

    #[test]
    fn test_custom_threshold() {
        let cfg = ClassifierConfig {
            z_threshold: 2.0,
            precision: 2,
        };
        let c = classify(&demo_samples(), "pv", &cfg).unwrap();
        assert_eq!(c.anomaly_indices(), vec![2]);
    }

    #[test]
    fn test_insufficient_samples() {
        let err = classify(&series("x", &[1.0]), "x", &ClassifierConfig::default()).unwrap_err();
        assert_eq!(
            err,
            AnomalyError::InsufficientSamples {
                required: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_missing_and_non_finite_field() {
        let mut samples = series("x", &[1.0, 2.0, 3.0]);
        samples[1].values.clear();
        let err = classify(&samples, "x", &ClassifierConfig::default()).unwrap_err();
        assert!(matches!(err, AnomalyError::MissingField { index: 1, .. }));

        let samples = series("x", &[1.0, f64::NAN, 3.0]);
        let err = classify(&samples, "x", &ClassifierConfig::default()).unwrap_err();
        assert!(matches!(err, AnomalyError::NonFiniteValue { index: 1, .. }));
    }

    #[test]
    fn test_classify_fields_merges_scores() {
        let fields = vec!["uv".to_string(), "pv".to_string()];
        let (points, stats) =
            classify_fields(&demo_samples(), &fields, &ClassifierConfig::default()).unwrap();
        assert_eq!(points.len(), 7);
        assert!(points.iter().all(|p| p.scores.len() == 2));
        assert_eq!(stats["uv"].threshold_high, 3509.23);
        assert_eq!(stats["uv"].threshold_low, 2076.48);
        assert!(points[0].score("uv").unwrap().is_anomaly);
        assert!(!points[0].score("pv").unwrap().is_anomaly);
    }
}
