use crate::domain::errors::{ForecastError, ForecastResult};
use crate::domain::indicators::{Indicator, IndicatorFrame};
use crate::domain::performance::Stats;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiZone {
    pub fn from_rsi(rsi: f64) -> Self {
        if rsi > 70.0 {
            RsiZone::Overbought
        } else if rsi < 30.0 {
            RsiZone::Oversold
        } else {
            RsiZone::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Uptrend,
    Downtrend,
}

/// Snapshot of the latest market state derived from an indicator frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub last_close: f64,
    pub change_pct: f64,
    pub rsi: Option<f64>,
    pub rsi_zone: Option<RsiZone>,
    pub macd: Option<f64>,
    /// MACD minus its signal line.
    pub macd_spread: Option<f64>,
    pub annualized_volatility: Option<f64>,
    pub average_volume: f64,
    /// Last volume relative to the average, minus one.
    pub volume_change: Option<f64>,
    pub trend: Option<TrendDirection>,
    /// |SMA-short - SMA-long| / last close.
    pub trend_strength: Option<f64>,
}

fn last_value(frame: &IndicatorFrame, indicator: Indicator) -> Option<f64> {
    frame.value(indicator, frame.len().checked_sub(1)?)
}

/// Summarizes the last bar of `frame`. Missing indicator columns leave their
/// fields empty.
pub fn market_summary(frame: &IndicatorFrame) -> ForecastResult<MarketSummary> {
    let bars = frame.series().bars();
    if bars.len() < 2 {
        return Err(ForecastError::data(format!(
            "market summary needs at least 2 bars, got {}",
            bars.len()
        )));
    }
    let last = &bars[bars.len() - 1];
    let previous = &bars[bars.len() - 2];

    let closes = frame.series().closes();
    let volumes = frame.series().volumes();
    let average_volume = volumes.iter().sum::<f64>() / volumes.len() as f64;

    let rsi = last_value(frame, Indicator::Rsi);
    let macd = last_value(frame, Indicator::Macd);
    let signal = last_value(frame, Indicator::MacdSignal);
    let (trend, trend_strength) = match (
        last_value(frame, Indicator::SmaShort),
        last_value(frame, Indicator::SmaLong),
    ) {
        (Some(short), Some(long)) => {
            let direction = if short > long {
                TrendDirection::Uptrend
            } else {
                TrendDirection::Downtrend
            };
            (Some(direction), Some((short - long).abs() / last.close))
        }
        _ => (None, None),
    };

    Ok(MarketSummary {
        last_close: last.close,
        change_pct: last.close / previous.close - 1.0,
        rsi,
        rsi_zone: rsi.map(RsiZone::from_rsi),
        macd,
        macd_spread: macd.zip(signal).map(|(m, s)| m - s),
        annualized_volatility: Stats::annualized_volatility(&closes),
        average_volume,
        volume_change: (average_volume > 0.0).then(|| last.volume / average_volume - 1.0),
        trend,
        trend_strength,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::indicators::IndicatorParams;
    use crate::domain::market::{PriceBar, Series};
    use chrono::{Duration, TimeZone, Utc};

    fn rising(n: usize) -> Series {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars = (0..n)
            .map(|i| {
                let c = 100.0 * 1.01f64.powi(i as i32);
                PriceBar::new(start + Duration::days(i as i64), c, c, c, c, 1000.0)
            })
            .collect();
        Series::new(bars).unwrap()
    }

    #[test]
    fn test_rising_market_summary() {
        let frame = IndicatorFrame::with_defaults(rising(60), &IndicatorParams::default()).unwrap();
        let summary = market_summary(&frame).unwrap();
        assert!((summary.change_pct - 0.01).abs() < 1e-9);
        assert_eq!(summary.rsi, Some(100.0));
        assert_eq!(summary.rsi_zone, Some(RsiZone::Overbought));
        assert_eq!(summary.trend, Some(TrendDirection::Uptrend));
        assert_eq!(summary.volume_change, Some(0.0));
        // constant 1% returns have no dispersion
        assert!(summary.annualized_volatility.unwrap() < 1e-9);
    }

    #[test]
    fn test_summary_without_indicators() {
        let frame = IndicatorFrame::new(rising(3));
        let summary = market_summary(&frame).unwrap();
        assert_eq!(summary.rsi, None);
        assert_eq!(summary.trend, None);
    }

    #[test]
    fn test_single_bar_is_rejected() {
        let frame = IndicatorFrame::new(rising(1));
        assert!(matches!(
            market_summary(&frame),
            Err(ForecastError::Data { .. })
        ));
    }

    #[test]
    fn test_rsi_zones() {
        assert_eq!(RsiZone::from_rsi(75.0), RsiZone::Overbought);
        assert_eq!(RsiZone::from_rsi(25.0), RsiZone::Oversold);
        assert_eq!(RsiZone::from_rsi(70.0), RsiZone::Neutral);
    }
}
