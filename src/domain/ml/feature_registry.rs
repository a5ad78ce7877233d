use crate::domain::errors::{ForecastError, ForecastResult};
use crate::domain::indicators::Indicator;
use chrono::{DateTime, Utc};

/// Raw OHLCV fields, always first in every feature vector.
/// This order MUST match between fitting and prediction; any change here is a
/// breaking change for trained models.
pub const BASE_FEATURES: &[&str] = &["open", "high", "low", "close", "volume"];

/// Name of the slot overwritten by the autoregressive forecast loop.
pub const CLOSE_FEATURE: &str = "close";

/// Ordered feature names for the requested indicators.
///
/// Non-feature indicators are ignored, duplicates collapse, and the result is
/// base fields followed by SMA-short, SMA-long, RSI, MACD (whichever are present).
pub fn feature_names(indicators: &[Indicator]) -> Vec<String> {
    let mut names: Vec<String> = BASE_FEATURES.iter().map(|s| s.to_string()).collect();
    names.extend(
        feature_indicators(indicators)
            .into_iter()
            .map(|i| i.name().to_string()),
    );
    names
}

/// Feature-eligible subset of `indicators`, deduplicated and in feature order.
pub fn feature_indicators(indicators: &[Indicator]) -> Vec<Indicator> {
    let mut selected: Vec<Indicator> = indicators
        .iter()
        .copied()
        .filter(Indicator::is_feature)
        .collect();
    selected.sort();
    selected.dedup();
    selected
}

pub fn close_index(names: &[String]) -> ForecastResult<usize> {
    names
        .iter()
        .position(|n| n == CLOSE_FEATURE)
        .ok_or_else(|| ForecastError::FeatureMismatch {
            expected: BASE_FEATURES.iter().map(|s| s.to_string()).collect(),
            actual: names.to_vec(),
        })
}

/// One row of the feature matrix, in the order given by its feature names.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub timestamp: DateTime<Utc>,
    pub values: Vec<f64>,
}
