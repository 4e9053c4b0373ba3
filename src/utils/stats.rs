use log::{
    debug,
    warn,
};
use ndarray::{
    Array1,
    Array2,
    ArrayView2,
    Axis,
};

use crate::data_structs::StandardizedMatrix;
use crate::error::{
    NetError,
    Result,
};

/// Column-standardizes `matrix` with sample statistics: every column gets
/// mean 0 and sample (n - 1) standard deviation 1.
///
/// A constant column is rejected with [`NetError::DegenerateColumn`]
/// instead of producing infinities or NaN. Columns are first mapped onto
/// [0, 1] by their range, so finite values of any magnitude standardize
/// without overflow; a column whose range itself overflows, or that holds a
/// non-finite value, is [`NetError::InvalidInput`].
pub fn standardize(matrix: ArrayView2<'_, f64>) -> Result<StandardizedMatrix> {
    let (n, p) = matrix.dim();
    if n < 2 {
        return Err(NetError::InvalidInput(format!(
            "standardization needs at least 2 samples, got {}",
            n
        )));
    }
    if p == 0 {
        return Err(NetError::InvalidInput("matrix has no columns".into()));
    }

    let mut mins = Array1::zeros(p);
    let mut ranges = Array1::zeros(p);
    for (column, values) in matrix.axis_iter(Axis(1)).enumerate() {
        if values.iter().any(|v| !v.is_finite()) {
            return Err(NetError::InvalidInput(format!(
                "column {} holds non-finite values",
                column
            )));
        }
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if min == max {
            warn!("Column {} is constant ({})", column, min);
            return Err(NetError::DegenerateColumn { column });
        }
        let range = max - min;
        if !range.is_finite() {
            return Err(NetError::InvalidInput(format!(
                "column {} spans {} to {}, beyond the f64 range",
                column, min, max
            )));
        }
        mins[column] = min;
        ranges[column] = range;
    }

    let scaled = (&matrix - &mins) / &ranges;
    let scaled_means = scaled
        .mean_axis(Axis(0))
        .ok_or_else(|| NetError::InvalidInput("matrix has no rows".into()))?;
    let scaled_sds = scaled.std_axis(Axis(0), 1.0);

    if let Some(column) = scaled_sds
        .iter()
        .position(|sd| !sd.is_finite() || *sd == 0.0)
    {
        return Err(NetError::DegenerateColumn { column });
    }

    let data = (&scaled - &scaled_means) / &scaled_sds;
    let means = &scaled_means * &ranges + &mins;
    let std_devs = &scaled_sds * &ranges;
    debug!("Standardized {} x {} matrix", n, p);
    Ok(StandardizedMatrix::new_unchecked(data, means, std_devs))
}

/// Sample correlation matrix of standardized data and the estimated
/// variance of each of its entries.
#[derive(Debug, Clone)]
pub struct CorrelationMoments {
    pub correlation: Array2<f64>,
    pub variance:    Array2<f64>,
}

impl CorrelationMoments {
    /// Computes both matrices in closed form from `x` (n x p, centered).
    ///
    /// With `w_kij = x_ki * x_kj` and `w_ij` its mean over samples,
    /// `s_ij = n / (n - 1) * w_ij` and
    /// `Var(s_ij) = n / (n - 1)^3 * sum_k (w_kij - w_ij)^2`.
    pub fn from_standardized(x: ArrayView2<'_, f64>) -> Result<Self> {
        let n = x.nrows();
        if n < 2 {
            return Err(NetError::InvalidInput(format!(
                "covariance moments need at least 2 samples, got {}",
                n
            )));
        }
        let nf = n as f64;

        let w_mean = x.t().dot(&x) / nf;
        let x_sq = x.mapv(|v| v * v);
        let w_sq_sum = x_sq.t().dot(&x_sq);

        // sum_k (w_k - w)^2 == sum_k w_k^2 - n * w^2
        let centered_sq = (&w_sq_sum - &(&w_mean * &w_mean * nf)).mapv(|v| v.max(0.0));
        let variance = centered_sq * (nf / (nf - 1.0).powi(3));
        let correlation = w_mean * (nf / (nf - 1.0));

        Ok(Self {
            correlation,
            variance,
        })
    }
}

/// `X'X / (n - 1)`; the sample correlation matrix when `x` is standardized.
pub fn sample_correlation(x: ArrayView2<'_, f64>) -> Array2<f64> {
    let n = x.nrows() as f64;
    x.t().dot(&x) / (n - 1.0)
}

/// Largest `|m[i, j] - m[j, i]|`. Non-square input yields infinity.
pub fn max_asymmetry(m: ArrayView2<'_, f64>) -> f64 {
    if m.nrows() != m.ncols() {
        return f64::INFINITY;
    }
    m.indexed_iter()
        .map(|((i, j), v)| (v - m[[j, i]]).abs())
        .fold(0.0, f64::max)
}

pub fn is_symmetric(
    m: ArrayView2<'_, f64>,
    tolerance: f64,
) -> bool {
    max_asymmetry(m) <= tolerance
}

/// `(m + m') / 2`.
pub fn symmetrize(m: &Array2<f64>) -> Array2<f64> {
    (m + &m.t()) / 2.0
}
