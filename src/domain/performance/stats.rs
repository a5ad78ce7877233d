use statrs::statistics::Statistics;

/// Trading days per year used for annualization.
pub const TRADING_DAYS: f64 = 252.0;

/// Shared statistics utilities for return series.
pub struct Stats;

impl Stats {
    /// Simple close-to-close returns; one element shorter than `prices`.
    pub fn calculate_returns(prices: &[f64]) -> Vec<f64> {
        prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
    }

    /// Sample standard deviation, `None` with fewer than two values.
    pub fn sample_std(values: &[f64]) -> Option<f64> {
        if values.len() < 2 {
            return None;
        }
        let sd = values.iter().std_dev();
        sd.is_finite().then_some(sd)
    }

    /// Sharpe ratio of periodic returns (sample std).
    ///
    /// annualize: if true, multiplies by sqrt(252). Zero volatility gives 0.
    pub fn sharpe_ratio(returns: &[f64], annualize: bool) -> f64 {
        let Some(std_dev) = Self::sample_std(returns) else {
            return 0.0;
        };
        if std_dev <= 1e-12 {
            return 0.0;
        }
        let ratio = returns.iter().mean() / std_dev;
        if annualize {
            ratio * TRADING_DAYS.sqrt()
        } else {
            ratio
        }
    }

    /// Annualized volatility of close-to-close returns.
    pub fn annualized_volatility(prices: &[f64]) -> Option<f64> {
        Self::sample_std(&Self::calculate_returns(prices)).map(|sd| sd * TRADING_DAYS.sqrt())
    }

    /// Largest fall below the running maximum, as a non-positive fraction.
    pub fn max_drawdown(prices: &[f64]) -> f64 {
        let mut peak = f64::NEG_INFINITY;
        let mut worst: f64 = 0.0;
        for &p in prices {
            peak = peak.max(p);
            worst = worst.min(p / peak - 1.0);
        }
        worst
    }
}
