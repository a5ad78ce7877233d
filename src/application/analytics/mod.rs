pub mod backtest;
pub mod market_summary;

pub use backtest::{BacktestSummary, Strategy, backtest};
pub use market_summary::{MarketSummary, RsiZone, TrendDirection, market_summary};
