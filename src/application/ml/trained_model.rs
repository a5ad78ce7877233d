use super::predictor::PricePredictor;
use super::scaler::MinMaxScaler;
use super::smartcore_predictor::{ModelParams, RandomForestPredictor};
use crate::domain::errors::{ForecastError, ForecastResult};

/// A fitted estimator together with the exact feature ordering and scaler it
/// was fitted with.
///
/// Built once per request and immutable afterwards. Prediction checks the
/// caller's feature names against the training-time ordering and reapplies
/// the training-time scaler.
///
/// The scaler is fitted on the training partition only, not on every
/// trainable row, so hold-out and forecast rows can land outside [0, 1] and
/// predictions differ numerically from a scaler fitted before the split.
pub struct TrainedModel {
    predictor: Box<dyn PricePredictor>,
    feature_names: Vec<String>,
    scaler: MinMaxScaler,
}

impl std::fmt::Debug for TrainedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainedModel")
            .field("predictor", &self.predictor.name())
            .field("feature_names", &self.feature_names)
            .finish()
    }
}

impl TrainedModel {
    /// Fits the scaler on `x_train`, then a random forest on the scaled rows.
    pub fn fit(
        feature_names: Vec<String>,
        x_train: &[Vec<f64>],
        y_train: &[f64],
        params: &ModelParams,
    ) -> ForecastResult<Self> {
        let scaler = MinMaxScaler::fit(x_train)?;
        let scaled = scaler.transform(x_train)?;
        let predictor = RandomForestPredictor::fit(&scaled, y_train, params)?;
        Self::from_parts(Box::new(predictor), feature_names, scaler)
    }

    /// Assembles a model from an already-fitted predictor and scaler.
    pub fn from_parts(
        predictor: Box<dyn PricePredictor>,
        feature_names: Vec<String>,
        scaler: MinMaxScaler,
    ) -> ForecastResult<Self> {
        if scaler.n_features() != feature_names.len() {
            return Err(ForecastError::Shape {
                expected: feature_names.len(),
                actual: scaler.n_features(),
            });
        }
        Ok(Self {
            predictor,
            feature_names,
            scaler,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn predictor_name(&self) -> &str {
        self.predictor.name()
    }

    pub fn check_features(&self, names: &[String]) -> ForecastResult<()> {
        if names != self.feature_names.as_slice() {
            return Err(ForecastError::FeatureMismatch {
                expected: self.feature_names.clone(),
                actual: names.to_vec(),
            });
        }
        Ok(())
    }

    /// Predicts from unscaled rows laid out as `names`.
    pub fn predict(&self, names: &[String], rows: &[Vec<f64>]) -> ForecastResult<Vec<f64>> {
        self.check_features(names)?;
        let scaled = self.scaler.transform(rows)?;
        let predictions = self.predictor.predict(&scaled)?;
        if predictions.len() != rows.len() {
            return Err(ForecastError::Shape {
                expected: rows.len(),
                actual: predictions.len(),
            });
        }
        Ok(predictions)
    }

    pub fn predict_one(&self, names: &[String], row: &[f64]) -> ForecastResult<f64> {
        let predictions = self.predict(names, &[row.to_vec()])?;
        predictions
            .first()
            .copied()
            .ok_or_else(|| ForecastError::model("No prediction returned"))
    }
}
