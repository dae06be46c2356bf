use crate::error::{Result, SimulationError};
use crate::model::matrix::Matrix;

//compounds return factors into price paths starting at the last real price
//row 0 is last_price in every column, row t = row t-1 * factors row t
//factor row 0 is never applied, the anchor row stands in for it
pub fn build_price_paths(factors: &Matrix, last_price: f64, day_count: usize) -> Result<Matrix> {
    if day_count == 0 {
        return Err(SimulationError::InvalidDayCount(day_count));
    }
    if factors.rows() < day_count {
        return Err(SimulationError::ShapeMismatch {
            rows: factors.rows(),
            day_count,
        });
    }

    let cols = factors.cols();
    let mut paths = Matrix::filled(day_count, cols, last_price);
    let data = paths.as_mut_slice();

    for t in 1..day_count {
        let step = factors.row(t);
        for c in 0..cols {
            data[t * cols + c] = data[(t - 1) * cols + c] * step[c];
        }
    }

    Ok(paths)
}
