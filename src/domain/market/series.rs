use crate::domain::errors::{ForecastError, ForecastResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    fn validate(&self) -> ForecastResult<()> {
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (field, value) in prices {
            if !value.is_finite() || value <= 0.0 {
                return Err(ForecastError::data(format!(
                    "bar at {} has non-positive or non-finite {}: {}",
                    self.timestamp, field, value
                )));
            }
        }
        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err(ForecastError::data(format!(
                "bar at {} has negative or non-finite volume: {}",
                self.timestamp, self.volume
            )));
        }
        Ok(())
    }
}

/// Chronologically ordered bars with unique timestamps.
///
/// Ordering and deduplication are the data provider's job; construction only
/// checks that they hold and refuses the series otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    bars: Vec<PriceBar>,
}

impl Series {
    pub fn new(bars: Vec<PriceBar>) -> ForecastResult<Self> {
        for bar in &bars {
            bar.validate()?;
        }
        for pair in bars.windows(2) {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(ForecastError::data(format!(
                    "timestamps must be strictly increasing: {} follows {}",
                    pair[1].timestamp, pair[0].timestamp
                )));
            }
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Fails with `Data` when there is nothing to compute over.
    pub fn ensure_not_empty(&self) -> ForecastResult<()> {
        if self.bars.is_empty() {
            return Err(ForecastError::data("series is empty"));
        }
        Ok(())
    }
}
