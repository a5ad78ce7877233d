use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub predicted_close: f64,
}

/// Ordered forecast for a fixed horizon.
///
/// Consumed once: iterating drains it, and there is no way to rewind. Getting
/// another forecast means running training and prediction again.
#[derive(Debug)]
pub struct Forecast {
    points: std::vec::IntoIter<ForecastPoint>,
}

impl Forecast {
    pub(crate) fn new(points: Vec<ForecastPoint>) -> Self {
        Self {
            points: points.into_iter(),
        }
    }
}

impl Iterator for Forecast {
    type Item = ForecastPoint;

    fn next(&mut self) -> Option<Self::Item> {
        self.points.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.points.size_hint()
    }
}

impl ExactSizeIterator for Forecast {}

impl std::iter::FusedIterator for Forecast {}

/// Discrete bucket for a model score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reliability {
    High,
    Medium,
    Low,
}

impl Reliability {
    /// > 0.7 is high, (0.5, 0.7] is medium, anything else is low.
    pub fn from_score(score: f64) -> Self {
        if score > 0.7 {
            Reliability::High
        } else if score > 0.5 {
            Reliability::Medium
        } else {
            Reliability::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Reliability::High => "high",
            Reliability::Medium => "medium",
            Reliability::Low => "low",
        }
    }
}

impl std::fmt::Display for Reliability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceReport {
    /// Hold-out coefficient of determination clamped to [0, 1]; absent when undefined.
    pub score: Option<f64>,
    pub reliability: Reliability,
    pub features_used: usize,
    pub data_points: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionMetrics {
    #[serde(rename = "MSE")]
    pub mse: f64,
    #[serde(rename = "RMSE")]
    pub rmse: f64,
    #[serde(rename = "MAE")]
    pub mae: f64,
}
