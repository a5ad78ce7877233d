//! Configuration module for pricecast.
//!
//! Loads indicator windows, model hyper-parameters and request defaults from
//! environment variables (or any other `ConfigSource`).

mod indicator_config;
mod model_config;
mod source;

pub use indicator_config::indicator_params_from;
pub use model_config::ModelEnvConfig;
pub use source::{ConfigSource, EnvSource};

use crate::application::indicators::IndicatorParams;
use crate::application::ml::{ForecasterConfig, PipelineConfig};
use crate::domain::indicators::Indicator;
use anyhow::{Context, Result};
use chrono::Duration;
use source::parse_u64;

/// Everything a forecasting run needs, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ForecastEnvConfig {
    pub indicators: IndicatorParams,
    pub forecaster: ForecasterConfig,
    /// Default number of days to forecast.
    pub horizon: usize,
    pub cache_ttl: Duration,
}

impl ForecastEnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_source(&EnvSource)
    }

    pub fn from_source(source: &dyn ConfigSource) -> Result<Self> {
        let indicators =
            indicator_params_from(source).context("Failed to load indicator config")?;
        let model =
            ModelEnvConfig::from_source(source).context("Failed to load model config")?;
        let ttl_secs = parse_u64(source, "CACHE_TTL_SECS", 300)?;

        Ok(Self {
            forecaster: ForecasterConfig {
                pipeline: PipelineConfig {
                    min_rows: model.min_training_rows,
                    indicators: Indicator::FEATURES.to_vec(),
                    params: indicators.clone(),
                },
                model: model.model,
                test_fraction: model.test_fraction,
            },
            indicators,
            horizon: model.horizon,
            cache_ttl: Duration::seconds(ttl_secs as i64),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = ForecastEnvConfig::from_source(&source(&[])).unwrap();
        assert_eq!(config.indicators, IndicatorParams::default());
        assert_eq!(config.forecaster, ForecasterConfig::default());
        assert_eq!(config.horizon, 7);
        assert_eq!(config.cache_ttl, Duration::seconds(300));
    }

    #[test]
    fn test_overrides() {
        let config = ForecastEnvConfig::from_source(&source(&[
            ("SMA_SHORT_WINDOW", "10"),
            ("N_TREES", "25"),
            ("MAX_DEPTH", "8"),
            ("TEST_FRACTION", "0.25"),
            ("FORECAST_HORIZON", "14"),
        ]))
        .unwrap();
        assert_eq!(config.indicators.sma_short_window, 10);
        assert_eq!(config.forecaster.pipeline.params.sma_short_window, 10);
        assert_eq!(config.forecaster.model.n_trees, 25);
        assert_eq!(config.forecaster.model.max_depth, Some(8));
        assert!((config.forecaster.test_fraction - 0.25).abs() < 1e-12);
        assert_eq!(config.horizon, 14);
    }

    #[test]
    fn test_unparsable_value_names_key() {
        let err = ForecastEnvConfig::from_source(&source(&[("RSI_WINDOW", "fourteen")]))
            .unwrap_err();
        assert!(format!("{:#}", err).contains("RSI_WINDOW"));
    }

    #[test]
    fn test_invalid_ranges_rejected() {
        assert!(ForecastEnvConfig::from_source(&source(&[("TEST_FRACTION", "1.5")])).is_err());
        assert!(ForecastEnvConfig::from_source(&source(&[("FORECAST_HORIZON", "0")])).is_err());
        assert!(ForecastEnvConfig::from_source(&source(&[("MACD_FAST", "30")])).is_err());
        assert!(ForecastEnvConfig::from_source(&source(&[("EMA_SPAN", "0")])).is_err());
    }
}
