//! Hold-out scoring and error metrics.
//!
//! The confidence run is an independent diagnostic: it builds and fits its
//! own model, so its split is not the one behind any forecast returned
//! alongside it.

use super::forecaster::{Forecaster, ForecasterConfig, TrainingRun};
use crate::domain::errors::{ForecastError, ForecastResult};
use crate::domain::forecast::{ConfidenceReport, PredictionMetrics, Reliability};
use crate::domain::indicators::IndicatorFrame;
use tracing::info;

/// Coefficient of determination. `None` when the actual values have zero
/// variance and the score is undefined.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> ForecastResult<Option<f64>> {
    check_pair(actual, predicted)?;
    let n = actual.len() as f64;
    let mean = actual.iter().sum::<f64>() / n;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    if ss_tot == 0.0 {
        return Ok(None);
    }
    Ok(Some(1.0 - ss_res / ss_tot))
}

fn check_pair(actual: &[f64], predicted: &[f64]) -> ForecastResult<()> {
    if actual.len() != predicted.len() {
        return Err(ForecastError::Shape {
            expected: actual.len(),
            actual: predicted.len(),
        });
    }
    if actual.is_empty() {
        return Err(ForecastError::data("cannot score empty sequences"));
    }
    Ok(())
}

/// MSE, RMSE and MAE of `predicted` against `actual`.
pub fn prediction_metrics(actual: &[f64], predicted: &[f64]) -> ForecastResult<PredictionMetrics> {
    check_pair(actual, predicted)?;
    let n = actual.len() as f64;
    let mse = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / n;
    let mae = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / n;
    Ok(PredictionMetrics {
        mse,
        rmse: mse.sqrt(),
        mae,
    })
}

pub fn classify(score: f64) -> Reliability {
    Reliability::from_score(score)
}

#[derive(Debug, Clone, Default)]
pub struct ConfidenceEvaluator {
    forecaster: Forecaster,
}

impl ConfidenceEvaluator {
    pub fn new(config: ForecasterConfig) -> Self {
        Self {
            forecaster: Forecaster::new(config),
        }
    }

    /// Runs its own pipeline, split and fit over `frame`, then scores the hold-out.
    pub fn evaluate(&self, frame: &IndicatorFrame) -> ForecastResult<ConfidenceReport> {
        let dataset = self.forecaster.pipeline().build(frame)?;
        let run = self.forecaster.train(&dataset)?;
        let report = Self::report(&run, dataset.len())?;
        info!(
            "Confidence: score={:?} reliability={} features={} rows={}",
            report.score, report.reliability, report.features_used, report.data_points
        );
        Ok(report)
    }

    /// Scores `run` on its hold-out rows.
    pub fn report(run: &TrainingRun, data_points: usize) -> ForecastResult<ConfidenceReport> {
        let names = run.model.feature_names().to_vec();
        let predicted = run.model.predict(&names, &run.test_x)?;
        let score = r2_score(&run.test_y, &predicted)?.map(|s| s.clamp(0.0, 1.0));
        let reliability = score.map(classify).unwrap_or(Reliability::Low);
        Ok(ConfidenceReport {
            score,
            reliability,
            features_used: names.len(),
            data_points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_zero_for_identical_sequences() {
        let values = [101.5, 99.25, 100.0, 103.75];
        let metrics = prediction_metrics(&values, &values).unwrap();
        assert_eq!(metrics.mse, 0.0);
        assert_eq!(metrics.rmse, 0.0);
        assert_eq!(metrics.mae, 0.0);
    }

    #[test]
    fn test_metrics_values() {
        let metrics = prediction_metrics(&[1.0, 2.0, 3.0], &[2.0, 2.0, 1.0]).unwrap();
        // errors: -1, 0, 2
        assert!((metrics.mse - 5.0 / 3.0).abs() < 1e-12);
        assert!((metrics.rmse - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!((metrics.mae - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_metrics_length_mismatch_is_shape_error() {
        let err = prediction_metrics(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::Shape {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_r2_score() {
        assert_eq!(r2_score(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap(), Some(1.0));
        let mean_only = r2_score(&[1.0, 2.0, 3.0], &[2.0, 2.0, 2.0]).unwrap().unwrap();
        assert!(mean_only.abs() < 1e-12);
        assert_eq!(r2_score(&[4.0, 4.0], &[4.0, 5.0]).unwrap(), None);
    }

    #[test]
    fn test_classification_is_monotone() {
        assert_eq!(classify(0.75), Reliability::High);
        assert_eq!(classify(0.6), Reliability::Medium);
        assert_eq!(classify(0.3), Reliability::Low);
    }
}
