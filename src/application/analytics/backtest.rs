use crate::domain::errors::{ForecastError, ForecastResult};
use crate::domain::indicators::{Indicator, IndicatorFrame};
use crate::domain::performance::Stats;
use serde::{Deserialize, Serialize};

/// Long/flat rule evaluated per bar from indicator columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// In the market while SMA-short is above SMA-long.
    MovingAverageCrossover,
    /// In the market while RSI is below 30 or above 70.
    RsiExtremes,
    /// In the market while MACD is above its signal line.
    MacdCrossover,
}

impl Strategy {
    fn signal_at(&self, frame: &IndicatorFrame, row: usize) -> bool {
        match self {
            Strategy::MovingAverageCrossover => {
                match (
                    frame.value(Indicator::SmaShort, row),
                    frame.value(Indicator::SmaLong, row),
                ) {
                    (Some(short), Some(long)) => short > long,
                    _ => false,
                }
            }
            Strategy::RsiExtremes => frame
                .value(Indicator::Rsi, row)
                .is_some_and(|rsi| !(30.0..=70.0).contains(&rsi)),
            Strategy::MacdCrossover => match (
                frame.value(Indicator::Macd, row),
                frame.value(Indicator::MacdSignal, row),
            ) {
                (Some(macd), Some(signal)) => macd > signal,
                _ => false,
            },
        }
    }

    fn required(&self) -> &'static [Indicator] {
        match self {
            Strategy::MovingAverageCrossover => &[Indicator::SmaShort, Indicator::SmaLong],
            Strategy::RsiExtremes => &[Indicator::Rsi],
            Strategy::MacdCrossover => &[Indicator::Macd, Indicator::MacdSignal],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub strategy: Strategy,
    /// 1 while in the market, 0 otherwise; aligned with the series.
    pub signals: Vec<u8>,
    /// Sum of per-bar strategy returns.
    pub total_return: f64,
    pub sharpe_ratio: f64,
    /// Max drawdown of the close itself, as a non-positive fraction.
    pub max_drawdown: f64,
}

/// Replays `strategy` over the frame: the return earned at bar t is the
/// position taken at t-1 times the close-to-close change into t.
pub fn backtest(frame: &IndicatorFrame, strategy: Strategy) -> ForecastResult<BacktestSummary> {
    if frame.len() < 2 {
        return Err(ForecastError::data(format!(
            "backtest needs at least 2 bars, got {}",
            frame.len()
        )));
    }
    if let Some(missing) = strategy.required().iter().find(|i| !frame.contains(**i)) {
        return Err(ForecastError::data(format!(
            "{:?} requires indicator column {}",
            strategy, missing
        )));
    }

    let signals: Vec<u8> = (0..frame.len())
        .map(|row| u8::from(strategy.signal_at(frame, row)))
        .collect();
    let closes = frame.series().closes();
    let strategy_returns: Vec<f64> = Stats::calculate_returns(&closes)
        .into_iter()
        .zip(signals.iter())
        .map(|(r, &held)| f64::from(held) * r)
        .collect();

    Ok(BacktestSummary {
        strategy,
        total_return: strategy_returns.iter().sum(),
        sharpe_ratio: Stats::sharpe_ratio(&strategy_returns, true),
        max_drawdown: Stats::max_drawdown(&closes),
        signals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::{PriceBar, Series};
    use chrono::{Duration, TimeZone, Utc};

    fn frame_with_rsi(closes: &[f64], rsi: Vec<Option<f64>>) -> IndicatorFrame {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar::new(start + Duration::days(i as i64), c, c, c, c, 10.0))
            .collect();
        let mut frame = IndicatorFrame::new(Series::new(bars).unwrap());
        frame.insert(Indicator::Rsi, rsi).unwrap();
        frame
    }

    #[test]
    fn test_returns_use_previous_signal() {
        let frame = frame_with_rsi(
            &[100.0, 110.0, 121.0, 108.9],
            vec![Some(80.0), Some(50.0), Some(20.0), None],
        );
        let summary = backtest(&frame, Strategy::RsiExtremes).unwrap();
        assert_eq!(summary.signals, vec![1, 0, 1, 0]);
        // held into bar 1 (+10%) and bar 3 (-10%)
        assert!(summary.total_return.abs() < 1e-12);
        assert!((summary.max_drawdown + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_missing_column_is_data_error() {
        let frame = frame_with_rsi(&[1.0, 2.0], vec![None, None]);
        assert!(matches!(
            backtest(&frame, Strategy::MacdCrossover),
            Err(ForecastError::Data { .. })
        ));
    }

    #[test]
    fn test_flat_position_has_zero_sharpe() {
        let frame = frame_with_rsi(&[1.0, 2.0, 3.0], vec![Some(50.0); 3]);
        let summary = backtest(&frame, Strategy::RsiExtremes).unwrap();
        assert_eq!(summary.total_return, 0.0);
        assert_eq!(summary.sharpe_ratio, 0.0);
    }
}
