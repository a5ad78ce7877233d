// Indicator library and frame builders
pub mod indicators;

// Feature pipeline, forecasting and confidence scoring
pub mod ml;

// Market summary and strategy replays
pub mod analytics;

// Caller-owned request cache
pub mod cache;
