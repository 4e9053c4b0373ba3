use nalgebra::DMatrix;
use ndarray::{
    Array2,
    ArrayView2,
};

use crate::data_structs::{
    LayerShape,
    Penalty,
};
use crate::error::{
    NetError,
    Result,
};
use crate::utils::{
    sample_correlation,
    symmetrize,
};

/// Factor applied to the sample correlation between features `i` and `j`.
pub(crate) fn keep_factor(
    shape: &LayerShape,
    penalty: &Penalty,
    i: usize,
    j: usize,
) -> f64 {
    let lambda_i = penalty.lambda_for(shape.layer_of(i));
    let lambda_j = penalty.lambda_for(shape.layer_of(j));
    ((1.0 - lambda_i) * (1.0 - lambda_j)).max(0.0).sqrt()
}

/// Shrunk covariance of the standardized, concatenated data: off-diagonal
/// entries scaled by [`keep_factor`], diagonal kept.
pub fn shrunk_covariance(
    data: ArrayView2<'_, f64>,
    shape: &LayerShape,
    penalty: &Penalty,
) -> Array2<f64> {
    let mut sigma = sample_correlation(data);
    for ((i, j), value) in sigma.indexed_iter_mut() {
        if i != j {
            *value *= keep_factor(shape, penalty, i, j);
        }
    }
    sigma
}

/// Inverse of a symmetric positive definite matrix via Cholesky.
pub fn precision(sigma: &Array2<f64>) -> Result<Array2<f64>> {
    let p = sigma.nrows();
    let dense = DMatrix::from_fn(p, p, |i, j| sigma[[i, j]]);
    let inverse = dense
        .cholesky()
        .ok_or_else(|| {
            NetError::Estimation(
                "shrunk covariance is not positive definite; \
                 more samples or a larger penalty are needed"
                    .into(),
            )
        })?
        .inverse();
    Ok(Array2::from_shape_fn((p, p), |(i, j)| inverse[(i, j)]))
}

/// `-theta_ij / sqrt(theta_ii * theta_jj)` with a zero diagonal.
pub fn partial_from_precision(theta: &Array2<f64>) -> Array2<f64> {
    let diag = theta.diag().mapv(f64::sqrt);
    let partial = Array2::from_shape_fn(theta.dim(), |(i, j)| {
        if i == j {
            0.0
        }
        else {
            -theta[[i, j]] / (diag[i] * diag[j])
        }
    });
    symmetrize(&partial)
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use ndarray::array;

    use super::*;

    #[test]
    fn keep_factor_within_and_across_layers() {
        let shape = LayerShape::paired(10, 2, 2);
        let penalty = Penalty::Paired {
            lambda_a: 0.36,
            lambda_b: 0.0,
        };
        assert_approx_eq!(keep_factor(&shape, &penalty, 0, 1), 0.64, 1e-12);
        assert_approx_eq!(keep_factor(&shape, &penalty, 2, 3), 1.0, 1e-12);
        assert_approx_eq!(keep_factor(&shape, &penalty, 0, 3), 0.8, 1e-12);
    }

    #[test]
    fn two_variable_partial_is_correlation() {
        // For two variables the partial correlation equals the correlation.
        let sigma = array![[1.0, 0.6], [0.6, 1.0]];
        let partial = partial_from_precision(&precision(&sigma).unwrap());
        assert_approx_eq!(partial[[0, 1]], 0.6, 1e-12);
        assert_approx_eq!(partial[[1, 0]], 0.6, 1e-12);
        assert_eq!(partial[[0, 0]], 0.0);
    }

    #[test]
    fn chain_has_no_direct_edge() {
        // x0 -> x1 -> x2: x0 and x2 are conditionally independent given x1.
        let r = 0.5;
        let sigma = array![[1.0, r, r * r], [r, 1.0, r], [r * r, r, 1.0]];
        let partial = partial_from_precision(&precision(&sigma).unwrap());
        assert_approx_eq!(partial[[0, 2]], 0.0, 1e-12);
        assert!(partial[[0, 1]] > 0.3);
    }

    #[test]
    fn singular_covariance_is_rejected() {
        let sigma = array![[1.0, 1.0], [1.0, 1.0]];
        assert!(matches!(precision(&sigma), Err(NetError::Estimation(_))));
    }

    #[test]
    fn full_shrinkage_gives_identity() {
        let data = array![[1.0, -1.0], [-1.0, 1.0], [0.5, 0.5], [-0.5, -0.5]];
        let shape = LayerShape::single(4, 2);
        let sigma = shrunk_covariance(data.view(), &shape, &Penalty::Single { lambda: 1.0 });
        assert_eq!(sigma[[0, 1]], 0.0);
        assert_eq!(sigma[[1, 0]], 0.0);
    }
}
