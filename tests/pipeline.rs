use montesim::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn history_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Date,Open,High,Low,Close,Volume,Symbol").unwrap();

    let closes = [
        150.0, 151.5, 149.8, 152.3, 153.0, 151.9, 154.2, 155.0, 153.7, 156.4, 157.1, 156.0,
    ];
    for (day, close) in closes.iter().enumerate() {
        writeln!(
            file,
            "2024-02-{:02},{},{},{},{},{},AAPL",
            day + 1,
            close - 0.5,
            close + 1.0,
            close - 1.0,
            close,
            1_000_000 + day * 1000
        )
        .unwrap();
        writeln!(file, "2024-02-{:02},10,11,9,10,500,MSFT", day + 1).unwrap();
    }

    file
}

#[test]
fn csv_history_to_summary() {
    let file = history_csv();
    let bars = filter_by_symbol(&load_csv(file.path()).unwrap(), "AAPL");
    assert_eq!(bars.len(), 12);

    let prices = close_prices(&bars);
    let result = run_simulation("AAPL", &prices, 500, 25, &PcgTrialStreams::new(2024)).unwrap();

    assert_eq!(result.paths.shape(), (25, 500));
    assert!(result.paths.row(0).iter().all(|&p| p == 156.0));
    assert!(result.paths.iter().all(|&p| p > 0.0 && p.is_finite()));
    assert!(result.warnings.is_empty());

    let summary = &result.summary;
    assert_eq!(summary.days_simulated(), 24);
    assert_eq!(summary.sim_count, 500);
    assert!(summary.distribution.min <= summary.mean && summary.mean <= summary.distribution.max);

    let expected_return = 100.0 * (summary.mean - 156.0) / summary.mean;
    assert!((summary.percent_return - expected_return).abs() < 1e-9);
}

#[test]
fn period_trims_history_before_estimation() {
    let file = history_csv();
    let bars = filter_by_symbol(&load_csv(file.path()).unwrap(), "AAPL");

    let recent = HistoryPeriod::parse("5d").unwrap().select(&bars).unwrap();
    assert_eq!(recent.len(), 6);

    let full = compute_log_returns(&close_prices(&bars)).unwrap();
    let trimmed = compute_log_returns(&close_prices(&recent)).unwrap();
    assert_eq!(trimmed.len(), 5);
    assert_eq!(&full[full.len() - 5..], trimmed.as_slice());
}

#[test]
fn manual_pipeline_matches_spec_scenario() {
    let prices = [100.0, 100.0, 100.0];
    let log_returns = compute_log_returns(&prices).unwrap();
    assert_eq!(log_returns, vec![0.0, 0.0]);

    let estimate = estimate_drift_volatility(&log_returns).unwrap();
    assert_eq!(estimate.drift, 0.0);
    assert_eq!(estimate.std_dev, 0.0);

    let mut rng = SeededUniform::new(17);
    let factors =
        sample_return_factors(estimate.drift, estimate.std_dev, 3, 2, &mut rng).unwrap();
    assert_eq!(factors.shape(), (3, 2));
    assert!(factors.iter().all(|&f| f == 1.0));

    let paths = build_price_paths(&factors, 100.0, 3).unwrap();
    assert!(paths.iter().all(|&p| p == 100.0));

    let outcome = summarize(&paths, 3).unwrap();
    assert_eq!(outcome.mean, 100.0);
    assert_eq!(outcome.percent_return, 0.0);
}

#[test]
fn injected_sequence_is_bit_reproducible() {
    let prices = [100.0, 102.0, 99.0, 101.5, 103.0];
    let log_returns = compute_log_returns(&prices).unwrap();
    let estimate = estimate_drift_volatility(&log_returns).unwrap();

    let draws = vec![0.12, 0.87, 0.45, 0.66, 0.31, 0.74, 0.05, 0.93];
    let run = || {
        let mut rng = SequenceUniform::new(draws.clone()).unwrap();
        let factors =
            sample_return_factors(estimate.drift, estimate.std_dev, 4, 2, &mut rng).unwrap();
        build_price_paths(&factors, 103.0, 4).unwrap()
    };

    let a = run();
    let b = run();
    assert_eq!(a.as_slice(), b.as_slice());
}

#[test]
fn zero_price_surfaces_invalid_input() {
    let err = run_simulation("BAD", &[0.0, 100.0], 10, 5, &PcgTrialStreams::new(1)).unwrap_err();
    assert!(matches!(err, SimulationError::NonPositivePrice { index: 0, .. }));
}
