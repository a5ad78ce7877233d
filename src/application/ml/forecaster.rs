use super::feature_pipeline::{FeatureDataset, FeaturePipeline, PipelineConfig};
use super::smartcore_predictor::ModelParams;
use super::split::{HoldoutSplit, train_test_split};
use super::trained_model::TrainedModel;
use crate::domain::errors::{ForecastError, ForecastResult};
use crate::domain::forecast::{Forecast, ForecastPoint};
use crate::domain::indicators::IndicatorFrame;
use crate::domain::ml::FeatureRecord;
use crate::domain::ml::feature_registry::close_index;
use chrono::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct ForecasterConfig {
    pub pipeline: PipelineConfig,
    pub model: ModelParams,
    /// Fraction of trainable rows held out for scoring.
    pub test_fraction: f64,
}

impl Default for ForecasterConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            model: ModelParams::default(),
            test_fraction: 0.2,
        }
    }
}

/// A freshly fitted model plus the rows it never saw.
#[derive(Debug)]
pub struct TrainingRun {
    pub model: TrainedModel,
    pub test_x: Vec<Vec<f64>>,
    pub test_y: Vec<f64>,
    pub train_rows: usize,
}

/// Fits a next-step close regressor and rolls it forward autoregressively.
///
/// Every call builds its own `TrainedModel`; nothing is kept between calls.
#[derive(Debug, Clone, Default)]
pub struct Forecaster {
    config: ForecasterConfig,
}

impl Forecaster {
    pub fn new(config: ForecasterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecasterConfig {
        &self.config
    }

    pub fn pipeline(&self) -> FeaturePipeline {
        FeaturePipeline::new(self.config.pipeline.clone())
    }

    /// Holds out `test_fraction` of the dataset and fits on the rest.
    pub fn train(&self, dataset: &FeatureDataset) -> ForecastResult<TrainingRun> {
        let HoldoutSplit {
            train_x,
            train_y,
            test_x,
            test_y,
        } = train_test_split(
            &dataset.matrix(),
            &dataset.targets,
            self.config.test_fraction,
            self.config.model.seed,
        )?;

        let model = TrainedModel::fit(
            dataset.feature_names.clone(),
            &train_x,
            &train_y,
            &self.config.model,
        )?;
        debug!(
            "Forecaster: fitted {} on {} rows, {} held out",
            model.predictor_name(),
            train_x.len(),
            test_x.len()
        );

        Ok(TrainingRun {
            model,
            test_x,
            test_y,
            train_rows: train_y.len(),
        })
    }

    /// Builds features from `frame`, trains, and forecasts `horizon` days past
    /// the last complete row.
    pub fn forecast(&self, frame: &IndicatorFrame, horizon: usize) -> ForecastResult<Forecast> {
        if horizon == 0 {
            return Err(ForecastError::invalid_parameter("horizon must be positive"));
        }
        let dataset = self.pipeline().build(frame)?;
        let run = self.train(&dataset)?;
        info!(
            "Forecaster: {} step forecast from {}",
            horizon, dataset.latest.timestamp
        );
        roll_forward(&run.model, &dataset.feature_names, &dataset.latest, horizon)
    }
}

/// Iterative multi-step forecast.
///
/// Each step predicts from the current vector, then copies it and overwrites
/// only the close slot with the prediction. Open, high, low, volume and every
/// indicator stay frozen at the seed row's values, so indicator signals go
/// stale as the horizon grows and error compounds through close alone.
pub fn roll_forward(
    model: &TrainedModel,
    feature_names: &[String],
    seed: &FeatureRecord,
    horizon: usize,
) -> ForecastResult<Forecast> {
    if horizon == 0 {
        return Err(ForecastError::invalid_parameter("horizon must be positive"));
    }
    model.check_features(feature_names)?;
    let close_idx = close_index(feature_names)?;

    let mut current = seed.values.clone();
    let mut points = Vec::with_capacity(horizon);
    for step in 1..=horizon {
        let predicted = model.predict_one(feature_names, &current)?;
        points.push(ForecastPoint {
            timestamp: seed.timestamp + Duration::days(step as i64),
            predicted_close: predicted,
        });

        let mut next = current.clone();
        next[close_idx] = predicted;
        current = next;
    }

    Ok(Forecast::new(points))
}
