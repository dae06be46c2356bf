use crate::data::bar::Bar;
use crate::error::SimulationError;
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

//how much history feeds the estimator, counted back from the latest bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryPeriod {
    #[default]
    Max,
    Days(u32),
    Weeks(u32),
    Months(u32),
    Years(u32),
}

impl HistoryPeriod {
    //parse tokens like max, 30d, 2wk, 6mo, 5y
    pub fn parse(s: &str) -> Result<Self, SimulationError> {
        let token = s.trim().to_lowercase();
        if token == "max" {
            return Ok(HistoryPeriod::Max);
        }

        let split = token
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| SimulationError::InvalidPeriod(s.to_string()))?;
        let (count, unit) = token.split_at(split);

        let count: u32 = count
            .parse()
            .map_err(|_| SimulationError::InvalidPeriod(s.to_string()))?;
        if count == 0 {
            return Err(SimulationError::InvalidPeriod(s.to_string()));
        }

        match unit {
            "d" => Ok(HistoryPeriod::Days(count)),
            "wk" => Ok(HistoryPeriod::Weeks(count)),
            "mo" => Ok(HistoryPeriod::Months(count)),
            "y" => Ok(HistoryPeriod::Years(count)),
            _ => Err(SimulationError::InvalidPeriod(s.to_string())),
        }
    }

    //earliest timestamp inside the period ending at `end`, none for max
    //a period reaching past the representable calendar is rejected
    pub fn start_from(&self, end: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, SimulationError> {
        let start = match *self {
            HistoryPeriod::Max => return Ok(None),
            HistoryPeriod::Days(n) => {
                Duration::try_days(n as i64).and_then(|span| end.checked_sub_signed(span))
            }
            HistoryPeriod::Weeks(n) => {
                Duration::try_weeks(n as i64).and_then(|span| end.checked_sub_signed(span))
            }
            HistoryPeriod::Months(n) => end.checked_sub_months(Months::new(n)),
            HistoryPeriod::Years(n) => n
                .checked_mul(12)
                .and_then(|months| end.checked_sub_months(Months::new(months))),
        };

        start
            .map(Some)
            .ok_or_else(|| SimulationError::InvalidPeriod(self.to_string()))
    }

    //keeps the bars inside the period, bars must be chronological
    pub fn select(&self, bars: &[Bar]) -> Result<Vec<Bar>, SimulationError> {
        let Some(last) = bars.last() else {
            return Ok(Vec::new());
        };

        let selected = match self.start_from(last.timestamp)? {
            Some(start) => bars
                .iter()
                .filter(|bar| bar.timestamp >= start)
                .cloned()
                .collect(),
            None => bars.to_vec(),
        };

        Ok(selected)
    }
}

impl FromStr for HistoryPeriod {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HistoryPeriod::parse(s)
    }
}

impl fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryPeriod::Max => write!(f, "max"),
            HistoryPeriod::Days(n) => write!(f, "{}d", n),
            HistoryPeriod::Weeks(n) => write!(f, "{}wk", n),
            HistoryPeriod::Months(n) => write!(f, "{}mo", n),
            HistoryPeriod::Years(n) => write!(f, "{}y", n),
        }
    }
}
