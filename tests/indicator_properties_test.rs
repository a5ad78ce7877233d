use chrono::{Duration, TimeZone, Utc};
use pricecast::application::indicators::{
    IndicatorParams, MacdParams, bollinger_bands, ema, macd, rsi, sma, vwap,
};
use pricecast::domain::errors::ForecastError;
use pricecast::domain::indicators::{Indicator, IndicatorFrame, Warmup};
use pricecast::domain::market::{PriceBar, Series};

fn series_from_closes(closes: &[f64]) -> Series {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            PriceBar::new(
                start + Duration::days(i as i64),
                c - 0.25,
                c + 1.0,
                c - 1.0,
                c,
                1_000.0 + 10.0 * i as f64,
            )
        })
        .collect();
    Series::new(bars).unwrap()
}

fn wavy_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|t| 100.0 + 0.4 * t as f64 + 3.0 * (t as f64 / 3.0).sin())
        .collect()
}

#[test]
fn test_sma_equals_trailing_mean() {
    let closes = wavy_closes(60);
    let series = series_from_closes(&closes);
    let column = sma(&series, 5, Warmup::Full).unwrap();

    assert_eq!(column.len(), closes.len());
    assert!(column[..4].iter().all(Option::is_none));
    for t in 4..closes.len() {
        let expected = closes[t - 4..=t].iter().sum::<f64>() / 5.0;
        let actual = column[t].unwrap();
        assert!((actual - expected).abs() < 1e-9, "row {}", t);
    }
}

#[test]
fn test_rsi_bounded_on_mixed_moves() {
    let series = series_from_closes(&wavy_closes(120));
    let column = rsi(&series, 14, Warmup::MinPeriods(1)).unwrap();
    for value in column.iter().flatten() {
        assert!((0.0..=100.0).contains(value));
    }
}

#[test]
fn test_rsi_is_100_on_non_decreasing_closes() {
    let closes: Vec<f64> = (0..40).map(|t| 50.0 + (t / 3) as f64).collect();
    let series = series_from_closes(&closes);
    let column = rsi(&series, 14, Warmup::MinPeriods(1)).unwrap();
    assert!(column.iter().all(|v| *v == Some(100.0)));
}

#[test]
fn test_macd_is_fast_minus_slow_ema() {
    let series = series_from_closes(&wavy_closes(100));
    let result = macd(&series, &MacdParams::default()).unwrap();
    let fast = ema(&series, 12, Warmup::Full).unwrap();
    let slow = ema(&series, 26, Warmup::Full).unwrap();

    assert!(result.macd[..25].iter().all(Option::is_none));
    for t in 25..100 {
        let expected = fast[t].unwrap() - slow[t].unwrap();
        assert!((result.macd[t].unwrap() - expected).abs() < 1e-9);
    }
    // signal needs nine defined MACD values
    assert!(result.signal[..33].iter().all(Option::is_none));
    assert!(result.signal[33].is_some());
}

#[test]
fn test_bollinger_bracket_the_middle() {
    let series = series_from_closes(&wavy_closes(80));
    let bands = bollinger_bands(&series, 20, 2.0, Warmup::Full).unwrap();
    let middle = sma(&series, 20, Warmup::Full).unwrap();
    assert_eq!(bands.middle, middle);
    for t in 19..80 {
        let (u, m, l) = (
            bands.upper[t].unwrap(),
            bands.middle[t].unwrap(),
            bands.lower[t].unwrap(),
        );
        assert!(l <= m && m <= u);
        assert!(((u - m) - (m - l)).abs() < 1e-9);
    }
}

#[test]
fn test_vwap_of_constant_close() {
    let series = series_from_closes(&[42.0; 10]);
    let column = vwap(&series).unwrap();
    for value in column {
        assert!((value.unwrap() - 42.0).abs() < 1e-9);
    }
}

#[test]
fn test_empty_series_rejected_everywhere() {
    let empty = Series::default();
    assert!(matches!(sma(&empty, 5, Warmup::Full), Err(ForecastError::Data { .. })));
    assert!(matches!(rsi(&empty, 14, Warmup::Full), Err(ForecastError::Data { .. })));
    assert!(matches!(vwap(&empty), Err(ForecastError::Data { .. })));
    assert!(matches!(
        macd(&empty, &MacdParams::default()),
        Err(ForecastError::Data { .. })
    ));
}

#[test]
fn test_frame_with_defaults_has_every_display_column() {
    let series = series_from_closes(&wavy_closes(70));
    let frame = IndicatorFrame::with_defaults(series, &IndicatorParams::default()).unwrap();
    for indicator in Indicator::ALL {
        let column = frame.column(indicator).unwrap();
        assert_eq!(column.len(), 70);
    }
    // strict display windows
    assert!(frame.value(Indicator::SmaLong, 48).is_none());
    assert!(frame.value(Indicator::SmaLong, 49).is_some());
    assert!(frame.value(Indicator::Rsi, 0).is_some());
}
