use crate::domain::errors::{ForecastError, ForecastResult};
use crate::domain::market::Series;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Indicator values aligned 1:1 with a series; `None` marks an undefined row.
pub type Column = Vec<Option<f64>>;

/// Closed set of indicator columns a frame can carry.
///
/// Declaration order matters: the feature-eligible variants come first and
/// their `Ord` is the feature-vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    SmaShort,
    SmaLong,
    Rsi,
    Macd,
    Ema,
    BollingerUpper,
    BollingerMiddle,
    BollingerLower,
    Vwap,
    MacdSignal,
}

impl Indicator {
    pub const ALL: [Indicator; 10] = [
        Indicator::SmaShort,
        Indicator::SmaLong,
        Indicator::Rsi,
        Indicator::Macd,
        Indicator::Ema,
        Indicator::BollingerUpper,
        Indicator::BollingerMiddle,
        Indicator::BollingerLower,
        Indicator::Vwap,
        Indicator::MacdSignal,
    ];

    /// Indicators usable as model features, in feature order.
    pub const FEATURES: [Indicator; 4] = [
        Indicator::SmaShort,
        Indicator::SmaLong,
        Indicator::Rsi,
        Indicator::Macd,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Indicator::SmaShort => "sma_short",
            Indicator::SmaLong => "sma_long",
            Indicator::Rsi => "rsi",
            Indicator::Macd => "macd",
            Indicator::Ema => "ema",
            Indicator::BollingerUpper => "bb_upper",
            Indicator::BollingerMiddle => "bb_middle",
            Indicator::BollingerLower => "bb_lower",
            Indicator::Vwap => "vwap",
            Indicator::MacdSignal => "macd_signal",
        }
    }

    pub fn is_feature(&self) -> bool {
        Self::FEATURES.contains(self)
    }
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How a windowed indicator treats its leading rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warmup {
    /// Undefined until the whole window is available.
    Full,
    /// Defined as soon as `n` samples exist, computed over what is there.
    MinPeriods(usize),
}

impl Warmup {
    pub fn min_periods(self, window: usize) -> usize {
        match self {
            Warmup::Full => window.max(1),
            Warmup::MinPeriods(n) => n.clamp(1, window.max(1)),
        }
    }
}

/// A series plus named indicator columns.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    series: Series,
    columns: BTreeMap<Indicator, Column>,
}

impl IndicatorFrame {
    pub fn new(series: Series) -> Self {
        Self {
            series,
            columns: BTreeMap::new(),
        }
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn insert(&mut self, indicator: Indicator, column: Column) -> ForecastResult<()> {
        if column.len() != self.series.len() {
            return Err(ForecastError::Shape {
                expected: self.series.len(),
                actual: column.len(),
            });
        }
        self.columns.insert(indicator, column);
        Ok(())
    }

    pub fn column(&self, indicator: Indicator) -> Option<&Column> {
        self.columns.get(&indicator)
    }

    pub fn contains(&self, indicator: Indicator) -> bool {
        self.columns.contains_key(&indicator)
    }

    /// Value of `indicator` at `row`, if the column exists and is defined there.
    pub fn value(&self, indicator: Indicator, row: usize) -> Option<f64> {
        self.columns
            .get(&indicator)
            .and_then(|c| c.get(row).copied().flatten())
    }

    pub fn indicators(&self) -> impl Iterator<Item = Indicator> + '_ {
        self.columns.keys().copied()
    }
}
