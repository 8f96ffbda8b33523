use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Keeps numeric columns of a chart row. Numeric strings are parsed, other
/// value types (labels, flags) are skipped.
fn deserialize_numeric_fields<'de, D>(d: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, Value> = BTreeMap::deserialize(d)?;
    let mut out = BTreeMap::new();
    for (key, value) in raw {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        if let Some(v) = parsed {
            out.insert(key, v);
        }
    }
    Ok(out)
}

/// One chart row: an optional x-axis label plus named numeric series values
/// that share the same index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten, deserialize_with = "deserialize_numeric_fields")]
    pub values: BTreeMap<String, f64>,
}

impl Sample {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: f64) -> Self {
        self.values.insert(field.into(), value);
        self
    }

    pub fn value(&self, field: &str) -> Option<f64> {
        self.values.get(field).copied()
    }
}

/// Mean, population standard deviation and the raw values at z = ±1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesStatistics {
    pub mean: f64,
    pub std_dev: f64,
    pub threshold_high: f64,
    pub threshold_low: f64,
}

impl SeriesStatistics {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            high: self.threshold_high,
            low: self.threshold_low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub high: f64,
    pub low: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZScore {
    pub z_score: f64,
    pub is_anomaly: bool,
}

/// A sample augmented with per-field z-scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedPoint {
    #[serde(flatten)]
    pub sample: Sample,
    pub scores: BTreeMap<String, ZScore>,
}

impl ClassifiedPoint {
    pub fn value(&self, field: &str) -> Option<f64> {
        self.sample.value(field)
    }

    pub fn score(&self, field: &str) -> Option<&ZScore> {
        self.scores.get(field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Normal,
    Anomaly,
}

impl SegmentKind {
    pub fn from_anomaly(is_anomaly: bool) -> Self {
        if is_anomaly {
            SegmentKind::Anomaly
        } else {
            SegmentKind::Normal
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SegmentKind::Normal => SegmentKind::Anomaly,
            SegmentKind::Anomaly => SegmentKind::Normal,
        }
    }
}

/// Position on the [0, 100] axis where the rendered color is `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Breakpoint {
    pub offset: f64,
    pub kind: SegmentKind,
}

/// A breakpoint with a concrete color, ready for a gradient `<stop>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: String,
}
