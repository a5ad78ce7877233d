pub mod forecast_cache;

pub use forecast_cache::{Clock, ForecastCache, RequestFingerprint, SystemClock};
