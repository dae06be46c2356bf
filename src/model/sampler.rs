use crate::error::{Result, SimulationError};
use crate::model::matrix::Matrix;
use crate::model::random::UniformSource;
use statrs::function::erf::erfc_inv;
use std::f64::consts::SQRT_2;

//uniforms are kept off the boundary so the inverse cdf stays finite
const MIN_UNIFORM: f64 = f64::EPSILON;
const MAX_UNIFORM: f64 = 1.0 - f64::EPSILON;

//largest cell count a single f64 buffer can address
const MAX_CELLS: usize = isize::MAX as usize / std::mem::size_of::<f64>();

//inverse cdf of the standard normal distribution
pub fn standard_normal_quantile(u: f64) -> f64 {
    -SQRT_2 * erfc_inv(2.0 * u.clamp(MIN_UNIFORM, MAX_UNIFORM))
}

//one discrete gbm step: exp((mu - 0.5 sigma^2) + sigma z)
#[inline]
pub fn return_factor(drift: f64, std_dev: f64, z: f64) -> f64 {
    (drift + std_dev * z).exp()
}

pub fn validate_shape(day_count: usize, sim_count: usize) -> Result<()> {
    if day_count == 0 {
        return Err(SimulationError::InvalidDayCount(day_count));
    }
    if sim_count == 0 {
        return Err(SimulationError::InvalidSimCount(sim_count));
    }
    match day_count.checked_mul(sim_count) {
        Some(cells) if cells <= MAX_CELLS => Ok(()),
        _ => Err(SimulationError::SimulationTooLarge {
            day_count,
            sim_count,
        }),
    }
}

//draws a day_count x sim_count matrix of return factors
//uniforms are consumed in row-major order (day by day, trial by trial)
pub fn sample_return_factors<R: UniformSource + ?Sized>(
    drift: f64,
    std_dev: f64,
    day_count: usize,
    sim_count: usize,
    rng: &mut R,
) -> Result<Matrix> {
    validate_shape(day_count, sim_count)?;

    let mut factors = Matrix::zeros(day_count, sim_count);
    rng.fill(factors.as_mut_slice());

    for cell in factors.as_mut_slice() {
        *cell = return_factor(drift, std_dev, standard_normal_quantile(*cell));
    }

    Ok(factors)
}

//draws the return factors of a single trial
pub fn sample_trial_factors<R: UniformSource + ?Sized>(
    drift: f64,
    std_dev: f64,
    day_count: usize,
    rng: &mut R,
) -> Vec<f64> {
    (0..day_count)
        .map(|_| return_factor(drift, std_dev, standard_normal_quantile(rng.next_uniform())))
        .collect()
}
