use argmin::core::{
    CostFunction,
    Error,
    Executor,
};
use argmin::solver::neldermead::NelderMead;
use itertools::Itertools;
use log::{
    debug,
    warn,
};
use ndarray::{
    s,
    Array2,
    ArrayView2,
};

use crate::error::{
    NetError,
    Result,
};
use crate::utils::CorrelationMoments;

/// Sum of the off-diagonal entries of a square block.
fn offdiag_sum(block: ArrayView2<'_, f64>) -> f64 {
    block.sum() - block.diag().sum()
}

/// Squared sample correlations, the plug-in estimate of `E[s_ij^2]`.
fn squared(moments: &CorrelationMoments) -> Array2<f64> {
    moments.correlation.mapv(|v| v * v)
}

/// Shrinkage intensity of a single layer:
/// `sum Var(s_ij) / sum s_ij^2` over `i != j`, clamped to [0, 1].
pub fn single_lambda(moments: &CorrelationMoments) -> f64 {
    let variance = offdiag_sum(moments.variance.view());
    let magnitude = offdiag_sum(squared(moments).view());

    if magnitude <= 0.0 {
        warn!("No off-diagonal correlation to shrink, using full shrinkage");
        return 1.0;
    }
    let lambda = (variance / magnitude).clamp(0.0, 1.0);
    debug!(
        "Single-layer intensity: var_sum={:.6}, sq_sum={:.6}, lambda={:.4}",
        variance, magnitude, lambda
    );
    lambda
}

/// Block sums entering the two-layer risk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskTerms {
    /// Off-diagonal `sum Var(s_ij)` inside layers A and B.
    pub within_var: [f64; 2],
    /// Off-diagonal `sum s_ij^2` inside layers A and B.
    pub within_sq:  [f64; 2],
    /// `sum Var(s_ij)` over both cross blocks.
    pub cross_var:  f64,
    /// `sum s_ij^2` over both cross blocks.
    pub cross_sq:   f64,
}

impl RiskTerms {
    /// `p_a` is the width of layer A; the rest of the moments belong to B.
    pub fn from_moments(
        moments: &CorrelationMoments,
        p_a: usize,
    ) -> Self {
        let var = moments.variance.view();
        let sq = squared(moments);

        Self {
            within_var: [
                offdiag_sum(var.slice(s![..p_a, ..p_a])),
                offdiag_sum(var.slice(s![p_a.., p_a..])),
            ],
            within_sq:  [
                offdiag_sum(sq.slice(s![..p_a, ..p_a])),
                offdiag_sum(sq.slice(s![p_a.., p_a..])),
            ],
            cross_var:  2.0 * var.slice(s![..p_a, p_a..]).sum(),
            cross_sq:   2.0 * sq.slice(s![..p_a, p_a..]).sum(),
        }
    }

    /// Expected squared error of the shrunk correlation matrix.
    ///
    /// An entry scaled by `c` contributes `c^2 Var(s) + (1 - c)^2 (E[s^2] -
    /// Var(s))`; `c = 1 - lambda_k` within layer k and
    /// `c = sqrt((1 - lambda_a)(1 - lambda_b))` across layers.
    pub fn risk(
        &self,
        lambda_a: f64,
        lambda_b: f64,
    ) -> f64 {
        let within = |k: usize, lambda: f64| {
            let keep = 1.0 - lambda;
            keep.powi(2) * self.within_var[k]
                + lambda.powi(2) * (self.within_sq[k] - self.within_var[k])
        };
        let cross_keep = ((1.0 - lambda_a) * (1.0 - lambda_b)).sqrt();
        let cross = cross_keep.powi(2) * self.cross_var
            + (1.0 - cross_keep).powi(2) * (self.cross_sq - self.cross_var);

        within(0, lambda_a) + within(1, lambda_b) + cross
    }
}

/// [`RiskTerms::risk`] as an argmin problem. Parameters are clamped into
/// the unit square so the unconstrained simplex never leaves it in effect.
struct PairedRisk {
    terms: RiskTerms,
}

impl CostFunction for PairedRisk {
    type Output = f64;
    type Param = Vec<f64>;

    fn cost(
        &self,
        param: &Self::Param,
    ) -> std::result::Result<Self::Output, Error> {
        let (a, b) = clamp_pair(param);
        Ok(self.terms.risk(a, b))
    }
}

fn clamp_pair(param: &[f64]) -> (f64, f64) {
    let a = param.first().copied().unwrap_or(0.0);
    let b = param.get(1).copied().unwrap_or(0.0);
    (a.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
}

/// Finest accepted grid spacing; a step of 1e-4 already costs 1e8 risk
/// evaluations.
pub const MIN_GRID_STEP: f64 = 1e-4;

/// Best point of a regular grid with spacing `step` over [0, 1]^2.
fn grid_search(
    terms: &RiskTerms,
    step: f64,
) -> (f64, f64, f64) {
    let n_steps = (1.0 / step).round().max(1.0) as usize;
    let axis = (0..=n_steps)
        .map(|i| (i as f64 / n_steps as f64).min(1.0))
        .collect_vec();

    axis.iter()
        .cartesian_product(axis.iter())
        .map(|(&a, &b)| (a, b, terms.risk(a, b)))
        .min_by(|x, y| x.2.total_cmp(&y.2))
        .unwrap_or((1.0, 1.0, terms.risk(1.0, 1.0)))
}

/// Jointly estimated intensities `(lambda_a, lambda_b)` of two layers.
///
/// A coarse grid locates the basin, Nelder-Mead refines it. The refined
/// point is only kept when it actually lowers the risk.
pub fn paired_lambdas(
    terms: &RiskTerms,
    grid_step: f64,
    max_iters: u64,
) -> Result<(f64, f64)> {
    if !(MIN_GRID_STEP..=1.0).contains(&grid_step) {
        return Err(NetError::Estimation(format!(
            "grid step must lie in [{}, 1], got {}",
            MIN_GRID_STEP, grid_step
        )));
    }

    let (grid_a, grid_b, grid_risk) = grid_search(terms, grid_step);
    debug!(
        "Grid optimum: lambda=({:.3}, {:.3}), risk={:.6}",
        grid_a, grid_b, grid_risk
    );

    let offset = |v: f64| if v + grid_step <= 1.0 { v + grid_step } else { v - grid_step };
    let simplex = vec![
        vec![grid_a, grid_b],
        vec![offset(grid_a), grid_b],
        vec![grid_a, offset(grid_b)],
    ];

    let refined = NelderMead::<Vec<f64>, f64>::new(simplex)
        .with_sd_tolerance(1e-12)
        .and_then(|solver| {
            Executor::new(PairedRisk { terms: *terms }, solver)
                .configure(|state| state.max_iters(max_iters))
                .run()
        });

    match refined {
        Ok(result) => {
            let state = result.state();
            match state.best_param.as_deref().map(clamp_pair) {
                Some((a, b)) if terms.risk(a, b) < grid_risk => {
                    debug!(
                        "Nelder-Mead optimum: lambda=({:.4}, {:.4}), risk={:.6}",
                        a,
                        b,
                        terms.risk(a, b)
                    );
                    Ok((a, b))
                },
                _ => Ok((grid_a, grid_b)),
            }
        },
        Err(e) => {
            warn!("Risk refinement failed, keeping grid optimum: {}", e);
            Ok((grid_a, grid_b))
        },
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use ndarray::array;

    use super::*;

    fn terms() -> RiskTerms {
        RiskTerms {
            within_var: [0.2, 0.05],
            within_sq:  [0.25, 0.6],
            cross_var:  0.3,
            cross_sq:   0.9,
        }
    }

    #[test]
    fn single_lambda_is_variance_ratio() {
        let moments = CorrelationMoments {
            correlation: array![[1.0, 0.5], [0.5, 1.0]],
            variance:    array![[0.0, 0.1], [0.1, 0.0]],
        };
        // 0.2 / (2 * 0.25)
        assert_approx_eq!(single_lambda(&moments), 0.4, 1e-12);
    }

    #[test]
    fn single_lambda_clamps_and_handles_one_feature() {
        let noisy = CorrelationMoments {
            correlation: array![[1.0, 0.1], [0.1, 1.0]],
            variance:    array![[0.0, 0.5], [0.5, 0.0]],
        };
        assert_eq!(single_lambda(&noisy), 1.0);

        let lone = CorrelationMoments {
            correlation: array![[1.0]],
            variance:    array![[0.0]],
        };
        assert_eq!(single_lambda(&lone), 1.0);
    }

    #[test]
    fn risk_terms_split_blocks() {
        let moments = CorrelationMoments {
            correlation: array![[1.0, 0.5, 0.2], [0.5, 1.0, 0.1], [0.2, 0.1, 1.0]],
            variance:    array![[9.0, 0.1, 0.3], [0.1, 9.0, 0.4], [0.3, 0.4, 9.0]],
        };
        let terms = RiskTerms::from_moments(&moments, 2);

        assert_approx_eq!(terms.within_var[0], 0.2, 1e-12);
        assert_approx_eq!(terms.within_var[1], 0.0, 1e-12);
        assert_approx_eq!(terms.within_sq[0], 0.5, 1e-12);
        assert_approx_eq!(terms.cross_var, 1.4, 1e-12);
        assert_approx_eq!(terms.cross_sq, 2.0 * (0.04 + 0.01), 1e-12);
    }

    #[test]
    fn equal_penalties_reduce_to_single_risk() {
        let t = terms();
        let lambda: f64 = 0.3;
        let v = t.within_var[0] + t.within_var[1] + t.cross_var;
        let e = t.within_sq[0] + t.within_sq[1] + t.cross_sq;
        let expected = (1.0 - lambda).powi(2) * v + lambda.powi(2) * (e - v);
        assert_approx_eq!(t.risk(lambda, lambda), expected, 1e-12);
    }

    #[test]
    fn paired_lambdas_beat_grid_neighbours() {
        let t = terms();
        let (a, b) = paired_lambdas(&t, 0.05, 500).unwrap();

        assert!((0.0..=1.0).contains(&a));
        assert!((0.0..=1.0).contains(&b));
        let best = t.risk(a, b);
        for (da, db) in [(0.01, 0.0), (-0.01, 0.0), (0.0, 0.01), (0.0, -0.01)] {
            let na = (a + da).clamp(0.0, 1.0);
            let nb = (b + db).clamp(0.0, 1.0);
            assert!(best <= t.risk(na, nb) + 1e-7);
        }
    }

    #[test]
    fn invalid_grid_step_rejected() {
        for step in [0.0, 1e-9, MIN_GRID_STEP / 2.0, 1.5, f64::NAN] {
            assert!(matches!(
                paired_lambdas(&terms(), step, 10),
                Err(NetError::Estimation(_))
            ));
        }
    }
}
