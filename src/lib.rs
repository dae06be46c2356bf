//a Rust-based Monte Carlo price-path simulator using geometric brownian motion

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod model;
pub mod telemetry;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{SimCountPreset, SimulationConfiguration};
    pub use crate::data::{close_prices, filter_by_symbol, load_csv, Bar, HistoryPeriod};
    pub use crate::engine::{
        run_simulation, terminal_values, SimulationConfig, SimulationEngine, SimulationResult,
    };
    pub use crate::error::{DegeneracyWarning, SimulationError};
    pub use crate::metrics::{summarize, OutcomeStats, SimulationSummary, TerminalDistribution};
    pub use crate::model::{
        build_price_paths, compute_log_returns, estimate_drift_volatility, sample_return_factors,
        ConstantStreams, ConstantUniform, DriftVolatility, Matrix, PcgTrialStreams,
        SeededUniform, SequenceUniform, TrialStreams, UniformSource,
    };
}
