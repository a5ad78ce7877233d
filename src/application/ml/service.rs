use super::confidence::ConfidenceEvaluator;
use super::forecaster::{Forecaster, ForecasterConfig};
use crate::domain::errors::ForecastResult;
use crate::domain::forecast::{ConfidenceReport, ForecastPoint};
use crate::domain::indicators::IndicatorFrame;
use crate::domain::market::Series;
use serde::Serialize;
use tracing::info;

/// What a forecasting request hands to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastOutcome {
    pub forecast: Vec<ForecastPoint>,
    pub confidence: ConfidenceReport,
}

/// One-shot request runner: forecast first, then an independent confidence run.
///
/// Holds configuration only; each `run` fits its own models.
#[derive(Debug, Clone, Default)]
pub struct ForecastService {
    config: ForecasterConfig,
}

impl ForecastService {
    pub fn new(config: ForecasterConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, series: Series, horizon: usize) -> ForecastResult<ForecastOutcome> {
        let frame = IndicatorFrame::new(series);
        self.run_on_frame(&frame, horizon)
    }

    pub fn run_on_frame(
        &self,
        frame: &IndicatorFrame,
        horizon: usize,
    ) -> ForecastResult<ForecastOutcome> {
        info!(
            "ForecastService: request over {} bars, horizon {}",
            frame.len(),
            horizon
        );
        let forecast: Vec<ForecastPoint> =
            Forecaster::new(self.config.clone()).forecast(frame, horizon)?.collect();
        let confidence = ConfidenceEvaluator::new(self.config.clone()).evaluate(frame)?;
        Ok(ForecastOutcome {
            forecast,
            confidence,
        })
    }
}
