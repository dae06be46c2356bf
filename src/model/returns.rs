use crate::error::{Result, SimulationError};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//drift and volatility estimated from a log-return series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftVolatility {
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    //mean - 0.5 * variance (ito correction)
    pub drift: f64,
    pub sample_count: usize,
}

impl DriftVolatility {
    pub fn is_finite(&self) -> bool {
        self.mean.is_finite() && self.variance.is_finite() && self.drift.is_finite()
    }
}

//checks that a price series can feed the logarithm
pub fn validate_prices(prices: &[f64]) -> Result<()> {
    if prices.len() < 2 {
        return Err(SimulationError::InsufficientHistory {
            len: prices.len(),
            required: 2,
        });
    }

    for (index, &price) in prices.iter().enumerate() {
        if !(price.is_finite() && price > 0.0) {
            return Err(SimulationError::NonPositivePrice { index, price });
        }
    }

    Ok(())
}

//converts a price series into log returns, one fewer than the input
//the first period has no predecessor and is dropped
pub fn compute_log_returns(prices: &[f64]) -> Result<Vec<f64>> {
    validate_prices(prices)?;

    let returns = prices
        .windows(2)
        .map(|pair| {
            let pct_change = (pair[1] - pair[0]) / pair[0];
            (1.0 + pct_change).ln()
        })
        .collect();

    Ok(returns)
}

//sample mean, sample variance (n - 1) and drift of a log-return series
//a single sample has no spread, its variance is taken as zero
pub fn estimate_drift_volatility(log_returns: &[f64]) -> Result<DriftVolatility> {
    if log_returns.is_empty() {
        return Err(SimulationError::InsufficientHistory {
            len: log_returns.len() + 1,
            required: 2,
        });
    }

    let mean = log_returns.mean();
    let variance = if log_returns.len() == 1 {
        tracing::debug!("single log-return sample, variance taken as 0");
        0.0
    } else {
        log_returns.variance()
    };
    let std_dev = variance.sqrt();

    Ok(DriftVolatility {
        mean,
        variance,
        std_dev,
        drift: mean - 0.5 * variance,
        sample_count: log_returns.len(),
    })
}
