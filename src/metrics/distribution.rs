use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, OrderStatistics, Statistics};

//spread of simulated prices on the final simulated day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalDistribution {
    pub trials: usize,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p05: f64,
    pub median: f64,
    pub p95: f64,
    //share of trials finishing strictly above the last real price
    pub prob_above_last: f64,
}

impl TerminalDistribution {
    pub fn from_terminal(values: &[f64], last_price: f64) -> Self {
        if values.is_empty() {
            return TerminalDistribution {
                trials: 0,
                std_dev: f64::NAN,
                min: f64::NAN,
                max: f64::NAN,
                p05: f64::NAN,
                median: f64::NAN,
                p95: f64::NAN,
                prob_above_last: f64::NAN,
            };
        }

        //sample std dev is undefined for one trial
        let std_dev = if values.len() > 1 {
            values.std_dev()
        } else {
            0.0
        };

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        //order statistics are meaningless once a trial has degenerated
        let (p05, median, p95) = if values.iter().all(|v| v.is_finite()) {
            let mut data = Data::new(values.to_vec());
            (data.percentile(5), data.median(), data.percentile(95))
        } else {
            (f64::NAN, f64::NAN, f64::NAN)
        };

        let above = values.iter().filter(|&&v| v > last_price).count();

        TerminalDistribution {
            trials: values.len(),
            std_dev,
            min,
            max,
            p05,
            median,
            p95,
            prob_above_last: above as f64 / values.len() as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_terminal_values() {
        let dist = TerminalDistribution::from_terminal(&[100.0; 10], 100.0);

        assert_eq!(dist.trials, 10);
        assert_eq!(dist.std_dev, 0.0);
        assert_eq!(dist.min, 100.0);
        assert_eq!(dist.max, 100.0);
        assert_eq!(dist.median, 100.0);
        assert_eq!(dist.prob_above_last, 0.0);
    }

    #[test]
    fn test_spread_and_probability() {
        let values: Vec<f64> = (1..=100).map(|v| v as f64).collect();
        let dist = TerminalDistribution::from_terminal(&values, 50.0);

        assert_eq!(dist.min, 1.0);
        assert_eq!(dist.max, 100.0);
        assert!(dist.p05 < dist.median && dist.median < dist.p95);
        assert!((dist.median - 50.5).abs() < 1e-9);
        assert!((dist.prob_above_last - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_single_trial() {
        let dist = TerminalDistribution::from_terminal(&[121.0], 110.0);
        assert_eq!(dist.std_dev, 0.0);
        assert_eq!(dist.prob_above_last, 1.0);
    }
}
