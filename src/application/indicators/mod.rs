mod frame;
pub mod library;

pub use frame::{IndicatorParams, WarmupPolicy};
pub use library::{
    BollingerBands, Macd, MacdParams, bollinger_bands, ema, macd, rsi, rsi_from_averages, sma,
    vwap,
};
