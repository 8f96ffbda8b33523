//! Classifier parameters and gradient palettes.

use crate::error::{AnomalyError, Result};
use crate::models::SegmentKind;
use serde::{Deserialize, Serialize};

/// Largest decimal precision accepted for threshold rounding.
pub const MAX_PRECISION: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Points with `|z| > z_threshold` are anomalies.
    pub z_threshold: f64,
    /// Decimal places the thresholds are rounded to.
    pub precision: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            z_threshold: 1.0,
            precision: 2,
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.z_threshold.is_finite() || self.z_threshold < 0.0 {
            return Err(AnomalyError::InvalidConfig(format!(
                "z_threshold must be a finite non-negative number, got {}",
                self.z_threshold
            )));
        }
        if self.precision > MAX_PRECISION {
            return Err(AnomalyError::InvalidConfig(format!(
                "precision must be at most {MAX_PRECISION}, got {}",
                self.precision
            )));
        }
        Ok(())
    }
}

/// Colors for the normal and anomalous parts of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub normal: String,
    pub anomaly: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new("#8884d8", "red")
    }
}

impl Palette {
    pub fn new(normal: impl Into<String>, anomaly: impl Into<String>) -> Self {
        Self {
            normal: normal.into(),
            anomaly: anomaly.into(),
        }
    }

    pub fn color(&self, kind: SegmentKind) -> &str {
        match kind {
            SegmentKind::Normal => &self.normal,
            SegmentKind::Anomaly => &self.anomaly,
        }
    }
}
