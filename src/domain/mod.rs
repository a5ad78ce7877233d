// Price series
pub mod market;

// Indicator columns and frames
pub mod indicators;

// Feature ordering shared by fitting and prediction
pub mod ml;

// Forecast and confidence outputs
pub mod forecast;

// Domain-specific error types
pub mod errors;

// Return-series statistics
pub mod performance;
