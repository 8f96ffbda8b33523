//! Mean and population standard deviation over a whole series.

use crate::error::{AnomalyError, Result};
use crate::models::SeriesStatistics;

pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(AnomalyError::InsufficientSamples {
            required: 1,
            actual: 0,
        });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by N, not N - 1).
pub fn std_dev(values: &[f64], mean: f64) -> Result<f64> {
    if values.is_empty() {
        return Err(AnomalyError::InsufficientSamples {
            required: 1,
            actual: 0,
        });
    }
    let sq_diff: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Ok((sq_diff / values.len() as f64).sqrt())
}

/// Round half away from zero to `precision` decimal places.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

impl SeriesStatistics {
    /// Statistics of the full series; thresholds sit at z = ±1, rounded.
    /// A constant series has exactly zero std dev, whatever rounding the
    /// summation would otherwise leave behind.
    pub fn compute(values: &[f64], precision: u32) -> Result<Self> {
        let (mean, std_dev) = match values.first() {
            Some(&first) if values.iter().all(|&v| v == first) => (first, 0.0),
            _ => {
                let m = mean(values)?;
                (m, std_dev(values, m)?)
            }
        };
        if !mean.is_finite() {
            return Err(AnomalyError::NonFiniteStatistic("mean"));
        }
        if !std_dev.is_finite() {
            return Err(AnomalyError::NonFiniteStatistic("std_dev"));
        }
        Ok(Self {
            mean,
            std_dev,
            threshold_high: round_to(mean + std_dev, precision),
            threshold_low: round_to(mean - std_dev, precision),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mean_std_closed_form() {
        let vals = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&vals).unwrap();
        assert_abs_diff_eq!(m, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(std_dev(&vals, m).unwrap(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_population_not_sample_std() {
        let vals = [1.0, 3.0];
        let m = mean(&vals).unwrap();
        // sample std would be sqrt(2)
        assert_abs_diff_eq!(std_dev(&vals, m).unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(matches!(
            mean(&[]),
            Err(AnomalyError::InsufficientSamples { actual: 0, .. })
        ));
        assert!(std_dev(&[], 0.0).is_err());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(6819.941006, 2), 6819.94);
        assert_eq!(round_to(1867.487564, 2), 1867.49);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(3.14159, 3), 3.142);
    }

    #[test]
    fn test_series_statistics_pv() {
        let pv = [2400.0, 1398.0, 9800.0, 3908.0, 4800.0, 3800.0, 4300.0];
        let stats = SeriesStatistics::compute(&pv, 2).unwrap();
        assert_abs_diff_eq!(stats.mean, 30406.0 / 7.0, epsilon = 1e-9);
        assert_abs_diff_eq!(stats.std_dev, 2476.226721346453, epsilon = 1e-6);
        assert_eq!(stats.threshold_high, round_to(stats.mean + stats.std_dev, 2));
        assert_eq!(stats.threshold_low, round_to(stats.mean - stats.std_dev, 2));
        assert_eq!(stats.threshold_high, 6819.94);
        assert_eq!(stats.threshold_low, 1867.49);
    }

    #[test]
    fn test_constant_series_has_zero_std() {
        let stats = SeriesStatistics::compute(&[5.0, 5.0, 5.0], 2).unwrap();
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.threshold_high, 5.0);
        assert_eq!(stats.threshold_low, 5.0);
    }

    #[test]
    fn test_inexact_constant_series_has_zero_std() {
        for v in [0.1, 1.1, 0.3, 123.456] {
            let stats = SeriesStatistics::compute(&[v; 7], 2).unwrap();
            assert_eq!(stats.mean, v);
            assert_eq!(stats.std_dev, 0.0);
            assert_eq!(stats.threshold_high, stats.threshold_low);
        }
    }

    #[test]
    fn test_overflowing_statistics_fail() {
        let err = SeriesStatistics::compute(&[1e308, 1e308, -1e308], 2).unwrap_err();
        assert_eq!(err, AnomalyError::NonFiniteStatistic("mean"));

        let err = SeriesStatistics::compute(&[1e308, -1e308], 2).unwrap_err();
        assert_eq!(err, AnomalyError::NonFiniteStatistic("std_dev"));
    }
}
