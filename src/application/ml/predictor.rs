use crate::domain::errors::ForecastResult;

/// Interface for fitted regression estimators.
///
/// Inputs are already scaled feature rows; the output is one predicted
/// next-step close per row.
pub trait PricePredictor: Send + Sync {
    fn predict(&self, rows: &[Vec<f64>]) -> ForecastResult<Vec<f64>>;

    /// Get model name/type
    fn name(&self) -> &str;
}
