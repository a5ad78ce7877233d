use super::library::{self, MacdParams};
use crate::domain::errors::ForecastResult;
use crate::domain::indicators::{Column, Indicator, IndicatorFrame, Warmup};
use crate::domain::market::Series;
use tracing::debug;

/// Window lengths and relaxed minimum periods for every indicator column.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub sma_short_window: usize,
    pub sma_short_min_periods: usize,
    pub sma_long_window: usize,
    pub sma_long_min_periods: usize,
    pub ema_span: usize,
    pub bollinger_window: usize,
    pub bollinger_k: f64,
    pub rsi_window: usize,
    pub rsi_min_periods: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub macd_fast_min_periods: usize,
    pub macd_slow_min_periods: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_short_window: 20,
            sma_short_min_periods: 5,
            sma_long_window: 50,
            sma_long_min_periods: 10,
            ema_span: 20,
            bollinger_window: 20,
            bollinger_k: 2.0,
            rsi_window: 14,
            rsi_min_periods: 1,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            macd_fast_min_periods: 5,
            macd_slow_min_periods: 10,
        }
    }
}

/// Which warm-up contract a column is computed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmupPolicy {
    /// Strict windows, for charting and analytics.
    Display,
    /// Minimum-period relaxation, for feature construction.
    Relaxed,
}

impl IndicatorParams {
    fn macd_params(&self, policy: WarmupPolicy) -> MacdParams {
        let (fast_warmup, slow_warmup, signal_warmup) = match policy {
            WarmupPolicy::Display => (Warmup::Full, Warmup::Full, Warmup::Full),
            WarmupPolicy::Relaxed => (
                Warmup::MinPeriods(self.macd_fast_min_periods),
                Warmup::MinPeriods(self.macd_slow_min_periods),
                Warmup::MinPeriods(1),
            ),
        };
        MacdParams {
            fast: self.macd_fast,
            slow: self.macd_slow,
            signal: self.macd_signal,
            fast_warmup,
            slow_warmup,
            signal_warmup,
        }
    }
}

impl Indicator {
    /// Warm-up contract of this column under `policy`. MACD columns carry
    /// theirs in `MacdParams`; VWAP has none.
    pub fn warmup(&self, params: &IndicatorParams, policy: WarmupPolicy) -> Warmup {
        match (self, policy) {
            (_, WarmupPolicy::Display) => match self {
                // RSI is defined from the first bar even for display
                Indicator::Rsi => Warmup::MinPeriods(1),
                _ => Warmup::Full,
            },
            (Indicator::SmaShort, WarmupPolicy::Relaxed) => {
                Warmup::MinPeriods(params.sma_short_min_periods)
            }
            (Indicator::SmaLong, WarmupPolicy::Relaxed) => {
                Warmup::MinPeriods(params.sma_long_min_periods)
            }
            (Indicator::Rsi, WarmupPolicy::Relaxed) => Warmup::MinPeriods(params.rsi_min_periods),
            (
                Indicator::BollingerUpper | Indicator::BollingerMiddle | Indicator::BollingerLower,
                WarmupPolicy::Relaxed,
            ) => Warmup::MinPeriods(2),
            (_, WarmupPolicy::Relaxed) => Warmup::MinPeriods(1),
        }
    }

    /// Computes this column over `series`.
    pub fn compute(
        &self,
        series: &Series,
        params: &IndicatorParams,
        policy: WarmupPolicy,
    ) -> ForecastResult<Column> {
        let warmup = self.warmup(params, policy);
        match self {
            Indicator::SmaShort => library::sma(series, params.sma_short_window, warmup),
            Indicator::SmaLong => library::sma(series, params.sma_long_window, warmup),
            Indicator::Ema => library::ema(series, params.ema_span, warmup),
            Indicator::Rsi => library::rsi(series, params.rsi_window, warmup),
            Indicator::Vwap => library::vwap(series),
            Indicator::BollingerUpper => Ok(library::bollinger_bands(
                series,
                params.bollinger_window,
                params.bollinger_k,
                warmup,
            )?
            .upper),
            Indicator::BollingerMiddle => Ok(library::bollinger_bands(
                series,
                params.bollinger_window,
                params.bollinger_k,
                warmup,
            )?
            .middle),
            Indicator::BollingerLower => Ok(library::bollinger_bands(
                series,
                params.bollinger_window,
                params.bollinger_k,
                warmup,
            )?
            .lower),
            Indicator::Macd => Ok(library::macd(series, &params.macd_params(policy))?.macd),
            Indicator::MacdSignal => {
                Ok(library::macd(series, &params.macd_params(policy))?.signal)
            }
        }
    }
}

impl IndicatorFrame {
    /// Frame with every display column computed under the strict contract.
    pub fn with_defaults(series: Series, params: &IndicatorParams) -> ForecastResult<Self> {
        series.ensure_not_empty()?;
        let mut frame = IndicatorFrame::new(series);

        let bands = library::bollinger_bands(
            frame.series(),
            params.bollinger_window,
            params.bollinger_k,
            Warmup::Full,
        )?;
        let macd = library::macd(frame.series(), &params.macd_params(WarmupPolicy::Display))?;

        for indicator in [
            Indicator::SmaShort,
            Indicator::SmaLong,
            Indicator::Ema,
            Indicator::Rsi,
            Indicator::Vwap,
        ] {
            let column = indicator.compute(frame.series(), params, WarmupPolicy::Display)?;
            frame.insert(indicator, column)?;
        }
        frame.insert(Indicator::BollingerUpper, bands.upper)?;
        frame.insert(Indicator::BollingerMiddle, bands.middle)?;
        frame.insert(Indicator::BollingerLower, bands.lower)?;
        frame.insert(Indicator::Macd, macd.macd)?;
        frame.insert(Indicator::MacdSignal, macd.signal)?;
        Ok(frame)
    }

    /// Computes any of `indicators` the frame does not already carry.
    /// Columns already present are kept as they are.
    pub fn ensure(
        &mut self,
        indicators: &[Indicator],
        params: &IndicatorParams,
        policy: WarmupPolicy,
    ) -> ForecastResult<()> {
        for &indicator in indicators {
            if self.contains(indicator) {
                continue;
            }
            debug!("Computing missing indicator {} ({:?})", indicator, policy);
            let column = indicator.compute(self.series(), params, policy)?;
            self.insert(indicator, column)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::PriceBar;
    use chrono::{Duration, TimeZone, Utc};

    fn trending(n: usize) -> Series {
        let start = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
        let bars = (0..n)
            .map(|i| {
                let c = 100.0 + i as f64 * 0.5 + ((i % 3) as f64 - 1.0);
                PriceBar::new(start + Duration::days(i as i64), c, c + 1.0, c - 1.0, c, 1e6)
            })
            .collect();
        Series::new(bars).unwrap()
    }

    #[test]
    fn test_with_defaults_populates_all_columns() {
        let frame = IndicatorFrame::with_defaults(trending(60), &IndicatorParams::default()).unwrap();
        for indicator in Indicator::ALL {
            let column = frame.column(indicator).unwrap();
            assert_eq!(column.len(), 60, "{} misaligned", indicator);
        }
        // Display SMA-long is strict
        assert_eq!(frame.value(Indicator::SmaLong, 48), None);
        assert!(frame.value(Indicator::SmaLong, 49).is_some());
        assert!(frame.value(Indicator::Rsi, 0).is_some());
    }

    #[test]
    fn test_relaxed_policy_fills_early_rows() {
        let series = trending(30);
        let params = IndicatorParams::default();
        let col = Indicator::SmaLong
            .compute(&series, &params, WarmupPolicy::Relaxed)
            .unwrap();
        assert_eq!(col[8], None);
        assert!(col[9].is_some());

        let macd = Indicator::Macd
            .compute(&series, &params, WarmupPolicy::Relaxed)
            .unwrap();
        assert_eq!(macd[8], None);
        assert!(macd[9].is_some());
    }

    #[test]
    fn test_ensure_keeps_existing_columns() {
        let series = trending(10);
        let mut frame = IndicatorFrame::new(series);
        frame.insert(Indicator::Rsi, vec![Some(42.0); 10]).unwrap();
        frame
            .ensure(
                &[Indicator::Rsi, Indicator::SmaShort],
                &IndicatorParams::default(),
                WarmupPolicy::Relaxed,
            )
            .unwrap();
        assert_eq!(frame.value(Indicator::Rsi, 0), Some(42.0));
        assert!(frame.contains(Indicator::SmaShort));
    }
}
