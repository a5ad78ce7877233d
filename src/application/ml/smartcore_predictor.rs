use super::predictor::PricePredictor;
use crate::domain::errors::{ForecastError, ForecastResult};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::debug;

/// Random forest hyper-parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParams {
    pub n_trees: usize,
    /// `None` grows trees until leaves are pure.
    pub max_depth: Option<u16>,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

impl ModelParams {
    fn to_smartcore(&self) -> RandomForestRegressorParameters {
        let params = RandomForestRegressorParameters::default()
            .with_n_trees(self.n_trees)
            .with_min_samples_split(self.min_samples_split)
            .with_seed(self.seed);
        match self.max_depth {
            Some(depth) => params.with_max_depth(depth),
            None => params,
        }
    }
}

fn to_matrix(rows: &[Vec<f64>]) -> ForecastResult<DenseMatrix<f64>> {
    DenseMatrix::from_2d_vec(&rows.to_vec())
        .map_err(|e| ForecastError::model(format!("Matrix creation failed: {}", e)))
}

/// Seeded bagged regression-tree ensemble backed by smartcore.
pub struct RandomForestPredictor {
    model: RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>,
    n_trees: usize,
}

impl std::fmt::Debug for RandomForestPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomForestPredictor")
            .field("n_trees", &self.n_trees)
            .finish()
    }
}

impl RandomForestPredictor {
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: &ModelParams) -> ForecastResult<Self> {
        if x.is_empty() {
            return Err(ForecastError::data("cannot fit a model on zero rows"));
        }
        if x.len() != y.len() {
            return Err(ForecastError::Shape {
                expected: x.len(),
                actual: y.len(),
            });
        }
        if params.n_trees == 0 {
            return Err(ForecastError::invalid_parameter("n_trees must be positive"));
        }

        debug!(
            "Training Random Forest Regressor (Trees: {}, Depth: {:?}, MinSplit: {}) on {} samples",
            params.n_trees,
            params.max_depth,
            params.min_samples_split,
            x.len()
        );
        let matrix = to_matrix(x)?;
        let model = RandomForestRegressor::fit(&matrix, &y.to_vec(), params.to_smartcore())
            .map_err(|e| ForecastError::model(format!("Training error: {}", e)))?;

        Ok(Self {
            model,
            n_trees: params.n_trees,
        })
    }
}

impl PricePredictor for RandomForestPredictor {
    fn predict(&self, rows: &[Vec<f64>]) -> ForecastResult<Vec<f64>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let matrix = to_matrix(rows)?;
        self.model
            .predict(&matrix)
            .map_err(|e| ForecastError::model(format!("Prediction failed: {}", e)))
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }
}
