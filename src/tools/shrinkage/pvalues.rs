use adjustp::{
    adjust as adjust_pvalues,
    Procedure,
};
use itertools::Itertools;
use log::debug;
use ndarray::{
    Array2,
    ArrayView2,
};
use serde::{
    Deserialize,
    Serialize,
};
use statrs::distribution::{
    Beta,
    ContinuousCDF,
};

use super::partial::keep_factor;
use crate::data_structs::{
    LayerShape,
    Penalty,
};
use crate::error::{
    NetError,
    Result,
};

/// Multiple-testing correction of the edge p-values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadjMethod {
    #[default]
    BenjaminiHochberg,
    BenjaminiYekutieli,
    Bonferroni,
}

impl PadjMethod {
    fn procedure(self) -> Procedure {
        match self {
            PadjMethod::BenjaminiHochberg => Procedure::BenjaminiHochberg,
            PadjMethod::BenjaminiYekutieli => Procedure::BenjaminiYekutieli,
            PadjMethod::Bonferroni => Procedure::Bonferroni,
        }
    }
}

/// Two-sided p-values of every off-diagonal partial correlation.
///
/// Under the null an unshrunk coefficient `r` from `n` samples satisfies
/// `r^2 ~ Beta(1/2, (n - 2)/2)`. The shrunk coefficient is `c * r` with `c`
/// the keep factor of the pair, so the observed value is rescaled by `c`
/// before the tail probability is taken. Diagonal entries are set to 1.
pub fn raw_p_values(
    partial_correlation: ArrayView2<'_, f64>,
    shape: &LayerShape,
    penalty: &Penalty,
) -> Result<Array2<f64>> {
    let p = shape.n_features();
    if partial_correlation.dim() != (p, p) {
        return Err(NetError::Estimation(format!(
            "partial correlation is {:?}, expected {}x{}",
            partial_correlation.dim(),
            p,
            p
        )));
    }
    if shape.n_samples < 3 {
        return Err(NetError::Estimation(format!(
            "p-values need at least 3 samples, got {}",
            shape.n_samples
        )));
    }

    let null = Beta::new(0.5, (shape.n_samples as f64 - 2.0) / 2.0)
        .map_err(|e| NetError::Estimation(e.to_string()))?;

    let p_values = Array2::from_shape_fn((p, p), |(i, j)| {
        if i == j {
            return 1.0;
        }
        let keep = keep_factor(shape, penalty, i, j);
        let observed = partial_correlation[[i, j]].abs();
        if keep <= 0.0 {
            // Fully shrunk pair: the coefficient is zero by construction.
            return 1.0;
        }
        let rescaled = observed / keep;
        if rescaled >= 1.0 {
            0.0
        }
        else {
            null.sf(rescaled * rescaled).clamp(0.0, 1.0)
        }
    });
    Ok(p_values)
}

/// Adjusts the upper-triangle p-values as one family of tests and mirrors
/// the result. Adjusted values never fall below the raw ones and never
/// exceed 1.
pub fn adjust(
    p_values: &Array2<f64>,
    method: PadjMethod,
) -> Array2<f64> {
    let p = p_values.nrows();
    let pairs = (0..p).tuple_combinations::<(usize, usize)>().collect_vec();
    let mut adjusted = Array2::ones((p, p));
    if pairs.is_empty() {
        return adjusted;
    }

    let raw = pairs
        .iter()
        .map(|&(i, j)| p_values[[i, j]])
        .collect_vec();
    let corrected = adjust_pvalues(&raw, method.procedure());
    debug!("Adjusted {} edge p-values with {:?}", raw.len(), method);

    for ((&(i, j), &r), &c) in pairs.iter().zip(raw.iter()).zip(corrected.iter()) {
        let value = c.max(r).min(1.0);
        adjusted[[i, j]] = value;
        adjusted[[j, i]] = value;
    }
    adjusted
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use ndarray::array;
    use rstest::rstest;

    use super::*;

    #[test]
    fn zero_correlation_has_unit_p_value() {
        let shape = LayerShape::single(50, 2);
        let partial = array![[0.0, 0.0], [0.0, 0.0]];
        let p = raw_p_values(partial.view(), &shape, &Penalty::Single { lambda: 0.2 }).unwrap();
        assert_approx_eq!(p[[0, 1]], 1.0, 1e-12);
        assert_eq!(p[[0, 0]], 1.0);
    }

    #[test]
    fn matches_t_distribution_without_shrinkage() {
        // r = 0.3, n = 30: t = r sqrt(n-2) / sqrt(1-r^2) = 1.6641, df = 28,
        // two-sided p = 0.1073
        let shape = LayerShape::single(30, 2);
        let partial = array![[0.0, 0.3], [0.3, 0.0]];
        let p = raw_p_values(partial.view(), &shape, &Penalty::Single { lambda: 0.0 }).unwrap();
        assert_approx_eq!(p[[0, 1]], 0.1073, 1e-3);
    }

    #[test]
    fn shrinkage_rescales_observed_value() {
        let shape = LayerShape::single(30, 2);
        let shrunk = array![[0.0, 0.15], [0.15, 0.0]];
        let unshrunk = array![[0.0, 0.3], [0.3, 0.0]];
        let p_shrunk =
            raw_p_values(shrunk.view(), &shape, &Penalty::Single { lambda: 0.5 }).unwrap();
        let p_plain =
            raw_p_values(unshrunk.view(), &shape, &Penalty::Single { lambda: 0.0 }).unwrap();
        assert_approx_eq!(p_shrunk[[0, 1]], p_plain[[0, 1]], 1e-12);
    }

    #[test]
    fn beyond_keep_factor_is_zero() {
        let shape = LayerShape::single(30, 2);
        let partial = array![[0.0, 0.6], [0.6, 0.0]];
        let p = raw_p_values(partial.view(), &shape, &Penalty::Single { lambda: 0.5 }).unwrap();
        assert_eq!(p[[0, 1]], 0.0);
    }

    #[test]
    fn too_few_samples() {
        let shape = LayerShape::single(2, 2);
        let partial = Array2::zeros((2, 2));
        assert!(matches!(
            raw_p_values(partial.view(), &shape, &Penalty::Single { lambda: 0.1 }),
            Err(NetError::Estimation(_))
        ));
    }

    #[rstest]
    #[case::bh(PadjMethod::BenjaminiHochberg)]
    #[case::by(PadjMethod::BenjaminiYekutieli)]
    #[case::bonferroni(PadjMethod::Bonferroni)]
    fn adjusted_dominates_raw(#[case] method: PadjMethod) {
        let raw = array![
            [1.0, 0.001, 0.04, 0.3],
            [0.001, 1.0, 0.02, 0.8],
            [0.04, 0.02, 1.0, 0.5],
            [0.3, 0.8, 0.5, 1.0]
        ];
        let adjusted = adjust(&raw, method);

        for ((i, j), a) in adjusted.indexed_iter() {
            assert!(*a >= raw[[i, j]]);
            assert!(*a <= 1.0);
            assert_eq!(*a, adjusted[[j, i]]);
        }
    }

    #[test]
    fn bonferroni_multiplies_by_family_size() {
        let raw = array![[1.0, 0.01, 0.02], [0.01, 1.0, 0.5], [0.02, 0.5, 1.0]];
        let adjusted = adjust(&raw, PadjMethod::Bonferroni);
        assert_approx_eq!(adjusted[[0, 1]], 0.03, 1e-12);
        assert_approx_eq!(adjusted[[0, 2]], 0.06, 1e-12);
        assert_approx_eq!(adjusted[[1, 2]], 1.0, 1e-12);
    }

    #[test]
    fn single_feature_has_no_tests() {
        let adjusted = adjust(&array![[1.0]], PadjMethod::BenjaminiHochberg);
        assert_eq!(adjusted, array![[1.0]]);
    }
}
