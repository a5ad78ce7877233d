pub mod confidence;
pub mod feature_pipeline;
pub mod forecaster;
pub mod predictor;
pub mod scaler;
pub mod service;
pub mod smartcore_predictor;
pub mod split;
pub mod trained_model;

pub use confidence::{ConfidenceEvaluator, classify, prediction_metrics, r2_score};
pub use feature_pipeline::{FeatureDataset, FeaturePipeline, PipelineConfig};
pub use forecaster::{Forecaster, ForecasterConfig, TrainingRun, roll_forward};
pub use service::{ForecastOutcome, ForecastService};
pub use smartcore_predictor::{ModelParams, RandomForestPredictor};
pub use trained_model::TrainedModel;
