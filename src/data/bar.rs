use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BarError {
    #[error("Invalid OHLC values: high ({high}) < low ({low})")]
    InvalidHighLow { high: f64, low: f64 },
    #[error("Invalid OHLC values: close ({close}) outside high-low range [{low}, {high}]")]
    InvalidClose { close: f64, high: f64, low: f64 },
    #[error("Non-positive close price: {0}")]
    NonPositiveClose(f64),
    #[error("Negative volume: {0}")]
    NegativeVolume(f64),
}

//one daily observation of an instrument's price history
//only the close feeds the simulation, the other fields are informational
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<f64>,
    pub symbol: Option<String>,
}

impl Bar {
    //creates a new Bar with validation
    pub fn new(
        timestamp: DateTime<Utc>,
        open: Option<f64>,
        high: Option<f64>,
        low: Option<f64>,
        close: f64,
        volume: Option<f64>,
        symbol: Option<String>,
    ) -> Result<Self, BarError> {
        if close.is_nan() || close <= 0.0 {
            return Err(BarError::NonPositiveClose(close));
        }

        if let (Some(high), Some(low)) = (high, low) {
            if high < low {
                return Err(BarError::InvalidHighLow { high, low });
            }
            if close < low || close > high {
                return Err(BarError::InvalidClose { close, high, low });
            }
        }

        if let Some(volume) = volume {
            if volume < 0.0 {
                return Err(BarError::NegativeVolume(volume));
            }
        }

        Ok(Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            symbol,
        })
    }

    //creates a close-only bar without validation
    pub fn from_close(timestamp: DateTime<Utc>, close: f64) -> Self {
        Bar {
            timestamp,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
            symbol: None,
        }
    }
}

//close prices in chronological order
pub fn close_prices(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|bar| bar.close).collect()
}
