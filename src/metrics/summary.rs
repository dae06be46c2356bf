use crate::error::{Result, SimulationError};
use crate::metrics::distribution::TerminalDistribution;
use crate::model::Matrix;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//mean terminal price and the reference percent return
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeStats {
    pub mean: f64,
    pub percent_return: f64,
}

//values on the final simulated day, one per trial
pub fn terminal_prices(paths: &Matrix, day_count: usize) -> Result<&[f64]> {
    if day_count == 0 {
        return Err(SimulationError::InvalidDayCount(day_count));
    }
    if paths.rows() < day_count {
        return Err(SimulationError::ShapeMismatch {
            rows: paths.rows(),
            day_count,
        });
    }
    Ok(paths.row(day_count - 1))
}

//mean of row day_count - 1 and
//percent_return = 100 * (mean - paths[0][1]) / mean
//the return is measured against the mean, not the starting price,
//and the reference cell is trial 1 of the anchor row (trial 0 when only one trial ran).
//every anchor cell holds the last real price so the choice of trial does not change the value
pub fn summarize(paths: &Matrix, day_count: usize) -> Result<OutcomeStats> {
    let terminal = terminal_prices(paths, day_count)?;
    let mean = terminal.mean();

    let reference_trial = if paths.cols() > 1 { 1 } else { 0 };
    let reference = paths.get(0, reference_trial).unwrap_or(f64::NAN);

    Ok(OutcomeStats {
        mean,
        percent_return: 100.0 * (mean - reference) / mean,
    })
}

//percent change from the last real price to the expected terminal price
pub fn percent_change_from_last(mean: f64, last_price: f64) -> f64 {
    100.0 * (mean - last_price) / last_price
}

//summary of one simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub ticker: String,
    pub day_count: usize,
    pub sim_count: usize,
    pub last_price: f64,
    pub mean: f64,
    pub percent_return: f64,
    pub percent_change_from_last: f64,
    pub distribution: TerminalDistribution,
}

impl SimulationSummary {
    pub fn from_paths(ticker: &str, paths: &Matrix, day_count: usize, last_price: f64) -> Result<Self> {
        let outcome = summarize(paths, day_count)?;
        let terminal = terminal_prices(paths, day_count)?;

        Ok(SimulationSummary {
            ticker: ticker.to_string(),
            day_count,
            sim_count: paths.cols(),
            last_price,
            mean: outcome.mean,
            percent_return: outcome.percent_return,
            percent_change_from_last: percent_change_from_last(outcome.mean, last_price),
            distribution: TerminalDistribution::from_terminal(terminal, last_price),
        })
    }

    //number of simulated steps after the anchor row
    pub fn days_simulated(&self) -> usize {
        self.day_count.saturating_sub(1)
    }

    pub fn is_finite(&self) -> bool {
        self.mean.is_finite() && self.percent_return.is_finite()
    }

    //the three report lines printed after a run
    pub fn report_lines(&self) -> Vec<String> {
        vec![
            format!("Days: {}", self.days_simulated()),
            format!("Expected Value on last: ${:.2}", self.mean),
            format!("Return: {:.2}%", self.percent_return),
        ]
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self) {
        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));

        table.add_row(Row::new(vec![
            Cell::new("Ticker"),
            Cell::new(&self.ticker),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Simulations"),
            Cell::new(&format!("{}", self.sim_count)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Days Simulated"),
            Cell::new(&format!("{}", self.days_simulated())),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Last Price"),
            Cell::new(&format!("${:.2}", self.last_price)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Expected Value"),
            Cell::new(&format!("${:.2}", self.mean)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Return (vs mean)"),
            Cell::new(&format!("{:.2}%", self.percent_return)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Change From Last"),
            Cell::new(&format!("{:.2}%", self.percent_change_from_last)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Std Dev"),
            Cell::new(&format!("${:.2}", self.distribution.std_dev)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Min / Max"),
            Cell::new(&format!(
                "${:.2} / ${:.2}",
                self.distribution.min, self.distribution.max
            )),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("5th / 50th / 95th Pct"),
            Cell::new(&format!(
                "${:.2} / ${:.2} / ${:.2}",
                self.distribution.p05, self.distribution.median, self.distribution.p95
            )),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("P(above last)"),
            Cell::new(&format!("{:.2}%", self.distribution.prob_above_last * 100.0)),
        ]));

        table.printstd();
    }
}
