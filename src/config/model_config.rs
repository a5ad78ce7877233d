//! Training and forecasting configuration.

use super::source::{ConfigSource, parse_f64, parse_optional_u16, parse_u64, parse_usize};
use crate::application::ml::ModelParams;
use anyhow::{Result, bail};

#[derive(Debug, Clone, PartialEq)]
pub struct ModelEnvConfig {
    pub model: ModelParams,
    pub min_training_rows: usize,
    pub test_fraction: f64,
    pub horizon: usize,
}

impl ModelEnvConfig {
    pub fn from_source(source: &dyn ConfigSource) -> Result<Self> {
        let defaults = ModelParams::default();
        let model = ModelParams {
            n_trees: parse_usize(source, "N_TREES", defaults.n_trees)?,
            max_depth: parse_optional_u16(source, "MAX_DEPTH")?,
            min_samples_split: parse_usize(
                source,
                "MIN_SAMPLES_SPLIT",
                defaults.min_samples_split,
            )?,
            seed: parse_u64(source, "RANDOM_SEED", defaults.seed)?,
        };
        if model.n_trees == 0 {
            bail!("N_TREES must be positive");
        }

        let min_training_rows = parse_usize(source, "MIN_TRAINING_ROWS", 50)?;
        if min_training_rows < 2 {
            bail!("MIN_TRAINING_ROWS must be at least 2, got {}", min_training_rows);
        }

        let test_fraction = parse_f64(source, "TEST_FRACTION", 0.2)?;
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            bail!("TEST_FRACTION must be in (0, 1), got {}", test_fraction);
        }

        let horizon = parse_usize(source, "FORECAST_HORIZON", 7)?;
        if horizon == 0 {
            bail!("FORECAST_HORIZON must be positive");
        }

        Ok(Self {
            model,
            min_training_rows,
            test_fraction,
            horizon,
        })
    }
}
