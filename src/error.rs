use thiserror::Error;

//invalid input surfaced before any simulation work begins
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid simulation count: {0} (must be at least 1)")]
    InvalidSimCount(usize),
    #[error("Invalid day count: {0} (must be at least 1)")]
    InvalidDayCount(usize),
    #[error("Insufficient price history: {len} observation(s), need at least {required}")]
    InsufficientHistory { len: usize, required: usize },
    #[error("Non-positive price {price} at index {index}")]
    NonPositivePrice { index: usize, price: f64 },
    #[error("Matrix has {rows} row(s) but {day_count} day(s) were requested")]
    ShapeMismatch { rows: usize, day_count: usize },
    #[error("Invalid history period '{0}' (expected max, <n>d, <n>wk, <n>mo or <n>y)")]
    InvalidPeriod(String),
    #[error("Invalid simulation preset '{0}' (expected low, medium or high)")]
    InvalidPreset(String),
    #[error("Simulation of {day_count} day(s) x {sim_count} trial(s) is too large to allocate")]
    SimulationTooLarge { day_count: usize, sim_count: usize },
    #[error("Failed to create thread pool: {0}")]
    ThreadPool(String),
}

//non-fatal numeric degeneracy, values are propagated unmasked
#[derive(Debug, Clone, PartialEq)]
pub enum DegeneracyWarning {
    //every factor equals exp(drift), paths are deterministic
    ZeroVolatility,
    //variance of a single log-return is taken as zero
    SingleReturnSample,
    NonFiniteEstimate { mean: f64, variance: f64 },
    NonFinitePaths { count: usize },
    NonFiniteSummary { mean: f64, percent_return: f64 },
}

impl std::fmt::Display for DegeneracyWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegeneracyWarning::ZeroVolatility => {
                write!(f, "zero volatility: every simulated path is deterministic")
            }
            DegeneracyWarning::SingleReturnSample => {
                write!(f, "single log-return sample: variance taken as 0")
            }
            DegeneracyWarning::NonFiniteEstimate { mean, variance } => write!(
                f,
                "non-finite return estimate (mean={}, variance={})",
                mean, variance
            ),
            DegeneracyWarning::NonFinitePaths { count } => {
                write!(f, "{} non-finite value(s) in the price path matrix", count)
            }
            DegeneracyWarning::NonFiniteSummary {
                mean,
                percent_return,
            } => write!(
                f,
                "non-finite summary (mean={}, return={}%)",
                mean, percent_return
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
