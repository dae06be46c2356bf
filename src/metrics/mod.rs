pub mod distribution;
pub mod summary;

pub use distribution::TerminalDistribution;
pub use summary::{
    percent_change_from_last, summarize, terminal_prices, OutcomeStats, SimulationSummary,
};
