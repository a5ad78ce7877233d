//! Feature/target construction for next-step close regression.
//!
//! Missing-value policy, applied in order:
//! 1. requested indicators absent from the frame are computed with
//!    minimum-period relaxation;
//! 2. rows with any undefined feature are dropped (never filled);
//! 3. fewer than `min_rows` remaining rows is an `InsufficientData` error;
//! 4. the final row has no target and is held back as the forecast seed.

use crate::application::indicators::{IndicatorParams, WarmupPolicy};
use crate::domain::errors::{ForecastError, ForecastResult};
use crate::domain::indicators::{Indicator, IndicatorFrame};
use crate::domain::market::Series;
use crate::domain::ml::FeatureRecord;
use crate::domain::ml::feature_registry::{close_index, feature_indicators, feature_names};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Minimum complete rows required before the target shift.
    pub min_rows: usize,
    pub indicators: Vec<Indicator>,
    pub params: IndicatorParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_rows: 50,
            indicators: Indicator::FEATURES.to_vec(),
            params: IndicatorParams::default(),
        }
    }
}

/// Output of the pipeline: trainable rows, their targets, and the seed row.
#[derive(Debug, Clone)]
pub struct FeatureDataset {
    /// Column order of every record; persist it with any model fitted on this set.
    pub feature_names: Vec<String>,
    pub records: Vec<FeatureRecord>,
    pub targets: Vec<f64>,
    /// Chronologically last complete row. It has no target.
    pub latest: FeatureRecord,
    /// Rows removed for containing undefined values.
    pub dropped_rows: usize,
}

impl FeatureDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn matrix(&self) -> Vec<Vec<f64>> {
        self.records.iter().map(|r| r.values.clone()).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeaturePipeline {
    config: PipelineConfig,
}

impl FeaturePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn build_from_series(&self, series: Series) -> ForecastResult<FeatureDataset> {
        self.build(&IndicatorFrame::new(series))
    }

    pub fn build(&self, frame: &IndicatorFrame) -> ForecastResult<FeatureDataset> {
        frame.series().ensure_not_empty()?;
        if self.config.min_rows < 2 {
            return Err(ForecastError::invalid_parameter(format!(
                "min_rows must be at least 2, got {}",
                self.config.min_rows
            )));
        }

        let indicators = feature_indicators(&self.config.indicators);
        let names = feature_names(&indicators);
        let close_idx = close_index(&names)?;

        let mut working = frame.clone();
        working.ensure(&indicators, &self.config.params, WarmupPolicy::Relaxed)?;

        let mut complete: Vec<FeatureRecord> = Vec::with_capacity(working.len());
        for (row, bar) in working.series().bars().iter().enumerate() {
            let mut values = vec![bar.open, bar.high, bar.low, bar.close, bar.volume];
            let mut defined = true;
            for &indicator in &indicators {
                match working.value(indicator, row) {
                    Some(v) if v.is_finite() => values.push(v),
                    _ => {
                        defined = false;
                        break;
                    }
                }
            }
            if defined {
                complete.push(FeatureRecord {
                    timestamp: bar.timestamp,
                    values,
                });
            }
        }

        let dropped_rows = working.len() - complete.len();
        if dropped_rows > 0 {
            debug!(
                "FeaturePipeline: dropped {} incomplete rows of {}",
                dropped_rows,
                working.len()
            );
        }

        if complete.len() < self.config.min_rows {
            return Err(ForecastError::InsufficientData {
                required: self.config.min_rows,
                available: complete.len(),
            });
        }

        // Target of each row is the close of the next complete row
        let targets: Vec<f64> = match complete.split_first() {
            Some((_, rest)) => rest.iter().map(|r| r.values[close_idx]).collect(),
            None => return Err(ForecastError::data("no complete rows left after cleaning")),
        };
        let latest = complete
            .pop()
            .ok_or_else(|| ForecastError::data("no complete rows left after cleaning"))?;

        debug!(
            "FeaturePipeline: {} trainable rows x {} features",
            complete.len(),
            names.len()
        );

        Ok(FeatureDataset {
            feature_names: names,
            records: complete,
            targets,
            latest,
            dropped_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::PriceBar;
    use chrono::{Duration, TimeZone, Utc};

    fn series(n: usize) -> Series {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars = (0..n)
            .map(|i| {
                let c = 50.0 + (i as f64 * 0.4).sin() * 3.0 + i as f64 * 0.1;
                PriceBar::new(
                    start + Duration::days(i as i64),
                    c - 0.2,
                    c + 0.8,
                    c - 0.9,
                    c,
                    10_000.0 + i as f64,
                )
            })
            .collect();
        Series::new(bars).unwrap()
    }

    #[test]
    fn test_ten_rows_is_insufficient() {
        let err = FeaturePipeline::default()
            .build_from_series(series(10))
            .unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientData { required: 50, .. }
        ));
    }

    #[test]
    fn test_row_accounting_with_relaxed_warmup() {
        let dataset = FeaturePipeline::default()
            .build_from_series(series(80))
            .unwrap();
        // SMA-long and MACD need 10 rows, so 9 are dropped
        assert_eq!(dataset.dropped_rows, 9);
        assert_eq!(dataset.len(), 80 - 1 - 9);
        assert_eq!(dataset.targets.len(), dataset.len());
        assert_eq!(
            dataset.feature_names,
            vec![
                "open", "high", "low", "close", "volume", "sma_short", "sma_long", "rsi", "macd"
            ]
        );
    }

    #[test]
    fn test_targets_are_next_close() {
        let s = series(70);
        let closes = s.closes();
        let dataset = FeaturePipeline::default().build_from_series(s).unwrap();
        // first kept row is index 9
        assert_eq!(dataset.records[0].values[3], closes[9]);
        assert_eq!(dataset.targets[0], closes[10]);
        assert_eq!(*dataset.targets.last().unwrap(), closes[69]);
        assert_eq!(dataset.latest.values[3], closes[69]);
    }

    #[test]
    fn test_base_features_only() {
        let pipeline = FeaturePipeline::new(PipelineConfig {
            indicators: vec![],
            ..Default::default()
        });
        let dataset = pipeline.build_from_series(series(60)).unwrap();
        assert_eq!(dataset.dropped_rows, 0);
        assert_eq!(dataset.len(), 59);
        assert_eq!(dataset.feature_names.len(), 5);
    }

    #[test]
    fn test_floor_applies_after_dropping() {
        // 58 rows minus 9 warm-up rows leaves 49 complete rows
        let err = FeaturePipeline::default()
            .build_from_series(series(58))
            .unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientData {
                required: 50,
                available: 49
            }
        ));
        assert!(FeaturePipeline::default().build_from_series(series(59)).is_ok());
    }

    #[test]
    fn test_strict_columns_already_present_are_respected() {
        let s = series(110);
        let mut frame = IndicatorFrame::new(s.clone());
        let strict = crate::application::indicators::sma(
            &s,
            50,
            crate::domain::indicators::Warmup::Full,
        )
        .unwrap();
        frame.insert(Indicator::SmaLong, strict).unwrap();
        let dataset = FeaturePipeline::default().build(&frame).unwrap();
        assert_eq!(dataset.dropped_rows, 49);
        assert_eq!(dataset.len(), 110 - 49 - 1);
    }

    #[test]
    fn test_strict_column_can_push_below_floor() {
        // 80 bars with a strict SMA-50 keep only 31 complete rows
        let s = series(80);
        let mut frame = IndicatorFrame::new(s.clone());
        let strict = crate::application::indicators::sma(
            &s,
            50,
            crate::domain::indicators::Warmup::Full,
        )
        .unwrap();
        frame.insert(Indicator::SmaLong, strict).unwrap();
        let err = FeaturePipeline::default().build(&frame).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientData {
                required: 50,
                available: 31
            }
        ));
    }

    #[test]
    fn test_row_floor_below_two_is_rejected() {
        for min_rows in [0, 1] {
            let pipeline = FeaturePipeline::new(PipelineConfig {
                min_rows,
                ..Default::default()
            });
            let err = pipeline.build_from_series(series(5)).unwrap_err();
            assert!(matches!(err, ForecastError::InvalidParameter { .. }));
        }
    }

    #[test]
    fn test_small_floor_with_no_complete_rows() {
        // 5 bars never reach the 10-period SMA-long warm-up
        let pipeline = FeaturePipeline::new(PipelineConfig {
            min_rows: 2,
            ..Default::default()
        });
        let err = pipeline.build_from_series(series(5)).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientData {
                required: 2,
                available: 0
            }
        ));
    }

    #[test]
    fn test_empty_series_is_data_error() {
        let err = FeaturePipeline::default()
            .build_from_series(Series::default())
            .unwrap_err();
        assert!(matches!(err, ForecastError::Data { .. }));
    }
}
