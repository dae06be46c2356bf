use crate::error::{DegeneracyWarning, Result, SimulationError};
use crate::metrics::{terminal_prices, SimulationSummary};
use crate::model::{
    build_price_paths, compute_log_returns, estimate_drift_volatility, sample_trial_factors,
    validate_shape, DriftVolatility, Matrix, TrialStreams,
};
use rayon::prelude::*;
use tracing::{debug, info, warn};

//result of a simulation run
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub summary: SimulationSummary,
    pub estimate: DriftVolatility,
    pub paths: Matrix,
    pub warnings: Vec<DegeneracyWarning>,
}

impl SimulationResult {
    //final-day price of every trial
    pub fn terminal_prices(&self) -> &[f64] {
        self.paths.row(self.paths.rows() - 1)
    }

    pub fn is_degenerate(&self) -> bool {
        !self.warnings.is_empty()
    }
}

//configuration for a simulation run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub sim_count: usize,
    pub day_count: usize,
    //none uses min(rayon threads, 8)
    pub workers: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            sim_count: 5000,
            day_count: 25,
            workers: None,
        }
    }
}

//runs the price series -> returns -> factors -> paths -> summary pipeline
pub struct SimulationEngine {
    config: SimulationConfig,
}

impl SimulationEngine {
    pub fn new(config: SimulationConfig) -> Self {
        SimulationEngine { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    //runs one simulation over the given history
    //fails before any sampling when the parameters or prices are invalid
    pub fn run<S: TrialStreams>(
        &self,
        ticker: &str,
        prices: &[f64],
        streams: &S,
    ) -> Result<SimulationResult> {
        let SimulationConfig {
            sim_count,
            day_count,
            ..
        } = self.config;

        validate_shape(day_count, sim_count)?;

        let log_returns = compute_log_returns(prices)?;
        let estimate = estimate_drift_volatility(&log_returns)?;
        let last_price = prices[prices.len() - 1];

        debug!(
            ticker,
            samples = estimate.sample_count,
            mean = estimate.mean,
            variance = estimate.variance,
            drift = estimate.drift,
            "estimated drift and volatility"
        );

        let mut warnings = Vec::new();
        if estimate.sample_count == 1 {
            warnings.push(DegeneracyWarning::SingleReturnSample);
        }
        if !estimate.is_finite() {
            warnings.push(DegeneracyWarning::NonFiniteEstimate {
                mean: estimate.mean,
                variance: estimate.variance,
            });
        } else if estimate.std_dev == 0.0 {
            warnings.push(DegeneracyWarning::ZeroVolatility);
        }

        let factors = self.sample_factors(&estimate, streams)?;
        let paths = build_price_paths(&factors, last_price, day_count)?;

        let non_finite = paths.iter().filter(|v| !v.is_finite()).count();
        if non_finite > 0 {
            warnings.push(DegeneracyWarning::NonFinitePaths { count: non_finite });
        }

        let summary = SimulationSummary::from_paths(ticker, &paths, day_count, last_price)?;
        if !summary.is_finite() {
            warnings.push(DegeneracyWarning::NonFiniteSummary {
                mean: summary.mean,
                percent_return: summary.percent_return,
            });
        }

        for warning in &warnings {
            warn!(ticker, %warning, "degenerate simulation");
        }

        info!(
            ticker,
            sim_count,
            day_count,
            mean = summary.mean,
            percent_return = summary.percent_return,
            "simulation complete"
        );

        Ok(SimulationResult {
            summary,
            estimate,
            paths,
            warnings,
        })
    }

    //samples every trial on its own stream across the worker pool
    //columns depend only on the trial index, never on the worker count
    fn sample_factors<S: TrialStreams>(
        &self,
        estimate: &DriftVolatility,
        streams: &S,
    ) -> Result<Matrix> {
        let day_count = self.config.day_count;
        let n_workers = self
            .config
            .workers
            .unwrap_or_else(|| rayon::current_num_threads().min(8))
            .max(1);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(n_workers)
            .build()
            .map_err(|e| SimulationError::ThreadPool(e.to_string()))?;

        let columns: Vec<Vec<f64>> = pool.install(|| {
            (0..self.config.sim_count)
                .into_par_iter()
                .map(|trial| {
                    let mut source = streams.stream(trial);
                    sample_trial_factors(estimate.drift, estimate.std_dev, day_count, &mut source)
                })
                .collect()
        });

        Matrix::from_columns(day_count, &columns).ok_or(SimulationError::ShapeMismatch {
            rows: columns.first().map(|c| c.len()).unwrap_or(0),
            day_count,
        })
    }
}

//runs a simulation with default worker settings
pub fn run_simulation<S: TrialStreams>(
    ticker: &str,
    prices: &[f64],
    sim_count: usize,
    day_count: usize,
    streams: &S,
) -> Result<SimulationResult> {
    let engine = SimulationEngine::new(SimulationConfig {
        sim_count,
        day_count,
        workers: None,
    });
    engine.run(ticker, prices, streams)
}

//final-day column values for an already built path matrix
pub fn terminal_values(paths: &Matrix, day_count: usize) -> Result<Vec<f64>> {
    terminal_prices(paths, day_count).map(|row| row.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConstantStreams, PcgTrialStreams};

    fn history() -> Vec<f64> {
        vec![
            100.0, 101.2, 100.7, 102.3, 103.1, 102.4, 104.0, 105.2, 104.8, 106.1, 105.5, 107.3,
        ]
    }

    #[test]
    fn test_constant_series_scenario() {
        let result = run_simulation("FLAT", &[100.0, 100.0, 100.0], 2, 3, &PcgTrialStreams::new(1))
            .unwrap();

        assert_eq!(result.paths.shape(), (3, 2));
        assert!(result.paths.iter().all(|&p| p == 100.0));
        assert_eq!(result.summary.mean, 100.0);
        assert_eq!(result.estimate.drift, 0.0);
        assert!(result.warnings.contains(&DegeneracyWarning::ZeroVolatility));
    }

    #[test]
    fn test_two_price_scenario() {
        let result =
            run_simulation("UP", &[100.0, 110.0], 1, 2, &ConstantStreams(0.5)).unwrap();

        assert!((result.estimate.drift - 1.1f64.ln()).abs() < 1e-12);
        assert_eq!(result.estimate.variance, 0.0);
        assert_eq!(result.paths.get(0, 0), Some(110.0));
        assert!((result.paths.get(1, 0).unwrap() - 121.0).abs() < 1e-9);
        assert!(result
            .warnings
            .contains(&DegeneracyWarning::SingleReturnSample));
    }

    #[test]
    fn test_single_day_is_anchor_only() {
        let result =
            run_simulation("UP", &[100.0, 110.0], 1, 1, &ConstantStreams(0.5)).unwrap();
        assert_eq!(result.paths.shape(), (1, 1));
        assert_eq!(result.summary.mean, 110.0);
        assert_eq!(result.summary.days_simulated(), 0);
    }

    #[test]
    fn test_anchor_row_is_last_price() {
        let prices = history();
        let result = run_simulation("T", &prices, 50, 10, &PcgTrialStreams::new(7)).unwrap();
        assert!(result.paths.row(0).iter().all(|&p| p == 107.3));
        assert_eq!(result.terminal_prices().len(), 50);
    }

    #[test]
    fn test_reproducible_with_same_seed() {
        let prices = history();
        let a = run_simulation("T", &prices, 64, 20, &PcgTrialStreams::new(42)).unwrap();
        let b = run_simulation("T", &prices, 64, 20, &PcgTrialStreams::new(42)).unwrap();
        assert_eq!(a.paths, b.paths);

        let c = run_simulation("T", &prices, 64, 20, &PcgTrialStreams::new(43)).unwrap();
        assert_ne!(a.paths, c.paths);
    }

    #[test]
    fn test_worker_count_does_not_change_output() {
        let prices = history();
        let streams = PcgTrialStreams::new(11);

        let single = SimulationEngine::new(SimulationConfig {
            sim_count: 40,
            day_count: 15,
            workers: Some(1),
        })
        .run("T", &prices, &streams)
        .unwrap();

        let many = SimulationEngine::new(SimulationConfig {
            sim_count: 40,
            day_count: 15,
            workers: Some(4),
        })
        .run("T", &prices, &streams)
        .unwrap();

        assert_eq!(single.paths, many.paths);
    }

    #[test]
    fn test_more_trials_only_add_columns() {
        let prices = history();
        let streams = PcgTrialStreams::new(5);
        let small = run_simulation("T", &prices, 10, 12, &streams).unwrap();
        let large = run_simulation("T", &prices, 25, 12, &streams).unwrap();

        for trial in 0..10 {
            assert_eq!(small.paths.column(trial), large.paths.column(trial));
        }
    }

    #[test]
    fn test_invalid_parameters_fail_fast() {
        let prices = history();
        let streams = PcgTrialStreams::new(1);

        assert_eq!(
            run_simulation("T", &prices, 0, 10, &streams).unwrap_err(),
            SimulationError::InvalidSimCount(0)
        );
        assert_eq!(
            run_simulation("T", &prices, 10, 0, &streams).unwrap_err(),
            SimulationError::InvalidDayCount(0)
        );
        assert!(matches!(
            run_simulation("T", &[0.0, 100.0], 10, 5, &streams),
            Err(SimulationError::NonPositivePrice { index: 0, .. })
        ));
        assert!(matches!(
            run_simulation("T", &[100.0], 10, 5, &streams),
            Err(SimulationError::InsufficientHistory { .. })
        ));
    }

    #[test]
    fn test_overflowing_history_is_flagged() {
        //the one price ratio overflows, so drift and every simulated price are infinite
        let result = run_simulation("HUGE", &[1e-300, 1e300], 2, 2, &ConstantStreams(0.5)).unwrap();

        assert!(!result.estimate.is_finite());
        assert!(result.paths.row(0).iter().all(|&p| p == 1e300));
        assert!(result.paths.row(1).iter().all(|p| p.is_infinite()));
        assert!(!result.summary.is_finite());
        assert!(!result.summary.mean.is_finite());
        assert!(result.is_degenerate());

        let warnings = &result.warnings;
        assert!(warnings.contains(&DegeneracyWarning::SingleReturnSample));
        assert!(warnings
            .iter()
            .any(|w| matches!(w, DegeneracyWarning::NonFiniteEstimate { .. })));
        assert!(warnings
            .iter()
            .any(|w| matches!(w, DegeneracyWarning::NonFinitePaths { count: 2 })));
        assert!(warnings
            .iter()
            .any(|w| matches!(w, DegeneracyWarning::NonFiniteSummary { .. })));
        assert!(!warnings.contains(&DegeneracyWarning::ZeroVolatility));
    }

    #[test]
    fn test_terminal_values_helper() {
        let result = run_simulation("T", &history(), 8, 6, &PcgTrialStreams::new(3)).unwrap();
        let values = terminal_values(&result.paths, 6).unwrap();
        assert_eq!(values, result.terminal_prices().to_vec());
    }
}
