pub mod feature_registry;

pub use feature_registry::{FeatureRecord, BASE_FEATURES, CLOSE_FEATURE};
