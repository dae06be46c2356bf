pub mod matrix;
pub mod paths;
pub mod random;
pub mod returns;
pub mod sampler;

pub use matrix::Matrix;
pub use paths::build_price_paths;
pub use random::{
    ConstantStreams, ConstantUniform, PcgTrialStreams, SeededUniform, SequenceUniform,
    TrialStreams, UniformSource,
};
pub use returns::{compute_log_returns, estimate_drift_volatility, validate_prices, DriftVolatility};
pub use sampler::{
    return_factor, sample_return_factors, sample_trial_factors, standard_normal_quantile,
    validate_shape,
};
