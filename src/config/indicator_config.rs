//! Indicator window configuration.

use super::source::{ConfigSource, parse_f64, parse_usize};
use crate::application::indicators::IndicatorParams;
use anyhow::{Result, bail};

pub fn indicator_params_from(source: &dyn ConfigSource) -> Result<IndicatorParams> {
    let defaults = IndicatorParams::default();
    let params = IndicatorParams {
        sma_short_window: parse_usize(source, "SMA_SHORT_WINDOW", defaults.sma_short_window)?,
        sma_short_min_periods: parse_usize(
            source,
            "SMA_SHORT_MIN_PERIODS",
            defaults.sma_short_min_periods,
        )?,
        sma_long_window: parse_usize(source, "SMA_LONG_WINDOW", defaults.sma_long_window)?,
        sma_long_min_periods: parse_usize(
            source,
            "SMA_LONG_MIN_PERIODS",
            defaults.sma_long_min_periods,
        )?,
        ema_span: parse_usize(source, "EMA_SPAN", defaults.ema_span)?,
        bollinger_window: parse_usize(source, "BOLLINGER_WINDOW", defaults.bollinger_window)?,
        bollinger_k: parse_f64(source, "BOLLINGER_K", defaults.bollinger_k)?,
        rsi_window: parse_usize(source, "RSI_WINDOW", defaults.rsi_window)?,
        rsi_min_periods: parse_usize(source, "RSI_MIN_PERIODS", defaults.rsi_min_periods)?,
        macd_fast: parse_usize(source, "MACD_FAST", defaults.macd_fast)?,
        macd_slow: parse_usize(source, "MACD_SLOW", defaults.macd_slow)?,
        macd_signal: parse_usize(source, "MACD_SIGNAL", defaults.macd_signal)?,
        macd_fast_min_periods: parse_usize(
            source,
            "MACD_FAST_MIN_PERIODS",
            defaults.macd_fast_min_periods,
        )?,
        macd_slow_min_periods: parse_usize(
            source,
            "MACD_SLOW_MIN_PERIODS",
            defaults.macd_slow_min_periods,
        )?,
    };

    for (key, window) in [
        ("SMA_SHORT_WINDOW", params.sma_short_window),
        ("SMA_LONG_WINDOW", params.sma_long_window),
        ("EMA_SPAN", params.ema_span),
        ("BOLLINGER_WINDOW", params.bollinger_window),
        ("RSI_WINDOW", params.rsi_window),
        ("MACD_FAST", params.macd_fast),
        ("MACD_SLOW", params.macd_slow),
        ("MACD_SIGNAL", params.macd_signal),
    ] {
        if window == 0 {
            bail!("{} must be positive", key);
        }
    }
    if params.macd_fast >= params.macd_slow {
        bail!(
            "MACD_FAST ({}) must be shorter than MACD_SLOW ({})",
            params.macd_fast,
            params.macd_slow
        );
    }

    Ok(params)
}
