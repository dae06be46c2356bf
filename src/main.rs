use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use montesim::prelude::*;
use montesim::telemetry::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "montesim")]
#[command(about = "A Monte Carlo price-path simulator using geometric brownian motion", long_about = None)]
struct Cli {
    //log level for diagnostics (RUST_LOG overrides)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //run a monte carlo simulation
    Run {
        //json configuration file, flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        //path to csv price history
        #[arg(long)]
        data: Option<PathBuf>,

        //ticker to simulate (eg aapl)
        #[arg(long)]
        ticker: Option<String>,

        //history period (max, 30d, 2wk, 6mo, 5y)
        #[arg(long)]
        period: Option<String>,

        //number of simulated trials
        #[arg(long, conflicts_with = "preset")]
        sims: Option<usize>,

        //simulation size preset (low, medium, high)
        #[arg(long)]
        preset: Option<String>,

        //number of days per path, including the anchor day
        #[arg(long)]
        days: Option<usize>,

        //base seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        //worker threads for sampling
        #[arg(long)]
        workers: Option<usize>,

        //output options
        //output path for final-day prices csv
        #[arg(long)]
        output_terminal_csv: Option<PathBuf>,

        //output path for the full price path matrix csv
        #[arg(long)]
        output_paths_csv: Option<PathBuf>,
    },

    //print drift and volatility estimated from the price history
    Estimate {
        //path to csv price history
        #[arg(long)]
        data: PathBuf,

        //ticker to estimate
        #[arg(long, default_value = "AAPL")]
        ticker: String,

        //history period (max, 30d, 2wk, 6mo, 5y)
        #[arg(long, default_value = "max")]
        period: String,
    },

    //write a default json configuration
    InitConfig {
        //destination path
        #[arg(long, default_value = "montesim.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data,
            ticker,
            period,
            sims,
            preset,
            days,
            seed,
            workers,
            output_terminal_csv,
            output_paths_csv,
        } => {
            let mut configuration = match config {
                Some(path) => SimulationConfiguration::from_json_file(&path)
                    .context(format!("Failed to load config from {:?}", path))?,
                None => SimulationConfiguration::default(),
            };

            if let Some(data) = data {
                configuration.data_path = data;
            }
            if let Some(ticker) = ticker {
                configuration.ticker = ticker;
            }
            if let Some(period) = period {
                configuration.period = HistoryPeriod::parse(&period)?;
            }
            if let Some(preset) = preset {
                configuration.sim_count = SimCountPreset::parse(&preset)?.sim_count();
            }
            if let Some(sims) = sims {
                configuration.sim_count = sims;
            }
            if let Some(days) = days {
                configuration.day_count = days;
            }
            if seed.is_some() {
                configuration.seed = seed;
            }
            if workers.is_some() {
                configuration.workers = workers;
            }
            if output_terminal_csv.is_some() {
                configuration.output_terminal_csv = output_terminal_csv;
            }
            if output_paths_csv.is_some() {
                configuration.output_paths_csv = output_paths_csv;
            }
            if let Some(level) = cli.log_level {
                configuration.log_level = level;
            }

            init_logging(&configuration.log_level)?;
            run(&configuration)?;
        }
        Commands::Estimate {
            data,
            ticker,
            period,
        } => {
            init_logging(cli.log_level.as_deref().unwrap_or("warn"))?;
            let period = HistoryPeriod::parse(&period)?;
            estimate(&data, &ticker, period)?;
        }
        Commands::InitConfig { output } => {
            SimulationConfiguration::default()
                .to_json_file(&output)
                .context(format!("Failed to write config to {:?}", output))?;
            println!("Default configuration written to {:?}", output);
        }
    }

    Ok(())
}

//loads the history for one ticker and trims it to the period
fn load_history(data_path: &PathBuf, ticker: &str, period: HistoryPeriod) -> Result<Vec<Bar>> {
    println!("Loading data from {:?}...", data_path);
    let all_bars =
        load_csv(data_path).context(format!("Failed to load data from {:?}", data_path))?;

    let bars = period.select(&filter_by_symbol(&all_bars, ticker))?;

    if bars.len() < 2 {
        anyhow::bail!(
            "Need at least 2 bars for {} over period {}, found {}",
            ticker,
            period,
            bars.len()
        );
    }

    println!("Loaded {} bars for {} (period {})", bars.len(), ticker, period);
    if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
        println!("Date range: {} to {}\n", first.timestamp, last.timestamp);
    }

    Ok(bars)
}

fn run(configuration: &SimulationConfiguration) -> Result<()> {
    println!("Montesim Monte Carlo Simulator");
    println!("==============================\n");

    let bars = load_history(
        &configuration.data_path,
        &configuration.ticker,
        configuration.period,
    )?;
    let prices = close_prices(&bars);

    let streams = match configuration.seed {
        Some(seed) => PcgTrialStreams::new(seed),
        None => PcgTrialStreams::from_entropy(),
    };

    println!("Simulations: {}", configuration.sim_count);
    println!("Days: {}", configuration.day_count);
    println!("Seed: {}\n", streams.seed);

    println!("Running simulation...\n");
    let engine = SimulationEngine::new(configuration.engine_config());
    let result = engine
        .run(&configuration.ticker, &prices, &streams)
        .context(format!("Simulation failed for {}", configuration.ticker))?;

    //report
    println!("{}", result.summary.ticker);
    for line in result.summary.report_lines() {
        println!("{}", line);
    }
    println!();
    result.summary.pretty_print_table();

    for warning in &result.warnings {
        println!("Warning: {}", warning);
    }

    //save outputs if requested
    if let Some(path) = &configuration.output_terminal_csv {
        save_terminal_csv(result.terminal_prices(), path)?;
        println!("\nTerminal prices saved to {:?}", path);
    }

    if let Some(path) = &configuration.output_paths_csv {
        save_paths_csv(&result.paths, path)?;
        println!("Price paths saved to {:?}", path);
    }

    Ok(())
}

fn estimate(data_path: &PathBuf, ticker: &str, period: HistoryPeriod) -> Result<()> {
    let bars = load_history(data_path, ticker, period)?;
    let prices = close_prices(&bars);

    let log_returns = compute_log_returns(&prices)?;
    let estimate = estimate_drift_volatility(&log_returns)?;

    println!("{}", ticker);
    println!("Log returns: {}", estimate.sample_count);
    println!("Mean: {:.6}", estimate.mean);
    println!("Variance: {:.6}", estimate.variance);
    println!("Std Dev: {:.6}", estimate.std_dev);
    println!("Drift: {:.6}", estimate.drift);

    Ok(())
}

fn save_terminal_csv(values: &[f64], path: &PathBuf) -> Result<()> {
    use std::io::Write;

    let mut file = std::fs::File::create(path)?;
    writeln!(file, "trial,price")?;

    for (trial, price) in values.iter().enumerate() {
        writeln!(file, "{},{}", trial, price)?;
    }

    Ok(())
}

fn save_paths_csv(paths: &Matrix, path: &PathBuf) -> Result<()> {
    use std::io::Write;

    let mut file = std::fs::File::create(path)?;
    let header: Vec<String> = (0..paths.cols()).map(|c| format!("trial_{}", c)).collect();
    writeln!(file, "day,{}", header.join(","))?;

    for day in 0..paths.rows() {
        let row: Vec<String> = paths.row(day).iter().map(|p| p.to_string()).collect();
        writeln!(file, "{},{}", day, row.join(","))?;
    }

    Ok(())
}
