//! Windowed indicator computations over a price series.
//!
//! Every function returns columns aligned 1:1 with the input series, with
//! `None` wherever the indicator is undefined under the requested warm-up.
//! All of them reject an empty series with `ForecastError::Data`.

use crate::domain::errors::{ForecastError, ForecastResult};
use crate::domain::indicators::{Column, Warmup};
use crate::domain::market::Series;
use statrs::statistics::Statistics;
use ta::Next;
use ta::indicators::ExponentialMovingAverage;

fn check_window(window: usize, what: &str) -> ForecastResult<()> {
    if window == 0 {
        return Err(ForecastError::invalid_parameter(format!(
            "{} window must be positive",
            what
        )));
    }
    Ok(())
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Applies `f` to the trailing window ending at every index, once at least
/// `min_periods` samples are available.
fn rolling<F>(values: &[f64], window: usize, min_periods: usize, f: F) -> Column
where
    F: Fn(&[f64]) -> Option<f64>,
{
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            if slice.len() >= min_periods {
                f(slice)
            } else {
                None
            }
        })
        .collect()
}

/// Recursive EMA seeded with the first sample, alpha = 2 / (span + 1).
fn ema_values(values: &[f64], span: usize) -> ForecastResult<Vec<f64>> {
    let mut ema = ExponentialMovingAverage::new(span)?;
    Ok(values.iter().map(|&v| ema.next(v)).collect())
}

fn mask_leading(values: Vec<f64>, min_periods: usize) -> Column {
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| if i + 1 >= min_periods { Some(v) } else { None })
        .collect()
}

/// Simple moving average of close.
pub fn sma(series: &Series, window: usize, warmup: Warmup) -> ForecastResult<Column> {
    series.ensure_not_empty()?;
    check_window(window, "SMA")?;
    Ok(rolling(
        &series.closes(),
        window,
        warmup.min_periods(window),
        |w| Some(mean(w)),
    ))
}

/// Exponential moving average of close. The recursion always starts at the
/// first bar; `warmup` only hides leading values.
pub fn ema(series: &Series, span: usize, warmup: Warmup) -> ForecastResult<Column> {
    series.ensure_not_empty()?;
    check_window(span, "EMA")?;
    let values = ema_values(&series.closes(), span)?;
    Ok(mask_leading(values, warmup.min_periods(span)))
}

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Column,
    pub middle: Column,
    pub lower: Column,
}

/// Bands at `k` sample standard deviations around the SMA.
pub fn bollinger_bands(
    series: &Series,
    window: usize,
    k: f64,
    warmup: Warmup,
) -> ForecastResult<BollingerBands> {
    series.ensure_not_empty()?;
    check_window(window, "Bollinger")?;
    if !k.is_finite() || k < 0.0 {
        return Err(ForecastError::invalid_parameter(format!(
            "Bollinger multiplier must be finite and non-negative, got {}",
            k
        )));
    }

    let closes = series.closes();
    let min_periods = warmup.min_periods(window);
    let middle = rolling(&closes, window, min_periods, |w| Some(mean(w)));
    // Sample std is undefined for a single observation
    let sigma = rolling(&closes, window, min_periods, |w| {
        let sd = w.iter().std_dev();
        if sd.is_finite() { Some(sd) } else { None }
    });

    let (upper, lower): (Column, Column) = middle
        .iter()
        .zip(sigma.iter())
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => (Some(m + k * s), Some(m - k * s)),
            _ => (None, None),
        })
        .unzip();

    Ok(BollingerBands {
        upper,
        middle,
        lower,
    })
}

/// Running volume-weighted average of close since the first bar.
pub fn vwap(series: &Series) -> ForecastResult<Column> {
    series.ensure_not_empty()?;
    let mut cum_pv = 0.0;
    let mut cum_volume = 0.0;
    Ok(series
        .bars()
        .iter()
        .map(|bar| {
            cum_pv += bar.close * bar.volume;
            cum_volume += bar.volume;
            if cum_volume > 0.0 {
                Some(cum_pv / cum_volume)
            } else {
                None
            }
        })
        .collect())
}

/// RSI from average gain and loss. A zero average loss means RS is infinite,
/// so the result is exactly 100.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

/// Relative strength index with rolling-mean gain/loss averages.
///
/// The first bar has no delta and contributes zero gain and zero loss.
pub fn rsi(series: &Series, window: usize, warmup: Warmup) -> ForecastResult<Column> {
    series.ensure_not_empty()?;
    check_window(window, "RSI")?;

    let closes = series.closes();
    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());
    gains.push(0.0);
    losses.push(0.0);
    for pair in closes.windows(2) {
        let delta = pair[1] - pair[0];
        gains.push(delta.max(0.0));
        losses.push((-delta).max(0.0));
    }

    let min_periods = warmup.min_periods(window);
    let avg_gain = rolling(&gains, window, min_periods, |w| Some(mean(w)));
    let avg_loss = rolling(&losses, window, min_periods, |w| Some(mean(w)));

    Ok(avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(g, l)| match (g, l) {
            (Some(g), Some(l)) => Some(rsi_from_averages(g, l)),
            _ => None,
        })
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
    pub fast_warmup: Warmup,
    pub slow_warmup: Warmup,
    pub signal_warmup: Warmup,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
            fast_warmup: Warmup::Full,
            slow_warmup: Warmup::Full,
            signal_warmup: Warmup::Full,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    pub macd: Column,
    pub signal: Column,
}

/// MACD line (fast EMA minus slow EMA) and its signal line.
///
/// The signal EMA runs over the defined MACD values only, seeded at the first
/// one.
pub fn macd(series: &Series, params: &MacdParams) -> ForecastResult<Macd> {
    series.ensure_not_empty()?;
    check_window(params.fast, "MACD fast")?;
    check_window(params.slow, "MACD slow")?;
    check_window(params.signal, "MACD signal")?;

    let closes = series.closes();
    let fast = mask_leading(
        ema_values(&closes, params.fast)?,
        params.fast_warmup.min_periods(params.fast),
    );
    let slow = mask_leading(
        ema_values(&closes, params.slow)?,
        params.slow_warmup.min_periods(params.slow),
    );

    let line: Column = fast
        .iter()
        .zip(slow.iter())
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let signal_min = params.signal_warmup.min_periods(params.signal);
    let mut signal_ema = ExponentialMovingAverage::new(params.signal)?;
    let mut seen = 0usize;
    let signal = line
        .iter()
        .map(|value| {
            let m = (*value)?;
            seen += 1;
            let s = signal_ema.next(m);
            if seen >= signal_min { Some(s) } else { None }
        })
        .collect();

    Ok(Macd {
        macd: line,
        signal,
    })
}
