//! Covariance shrinkage backend.
//!
//! The sample correlation matrix `S` of the standardized layers is shrunk
//! towards its diagonal. Within layer `k` the off-diagonal entries are scaled
//! by `1 - lambda_k`, entries linking two layers by
//! `sqrt((1 - lambda_a) * (1 - lambda_b))`. With a single layer this is the
//! classic James-Stein type shrinkage of a Gaussian graphical model; with two
//! layers each layer keeps its own intensity while cross-layer edges are
//! still estimated jointly.
//!
//! - [`penalty`]: intensity estimation (closed form for one layer, a
//!   bounded two-dimensional risk minimization for two).
//! - [`partial`]: shrunk covariance, precision and partial correlations.
//! - [`pvalues`]: null distribution of shrunk coefficients and
//!   multiple-testing adjustment.
pub mod partial;
pub mod penalty;
pub mod pvalues;

use log::{
    debug,
    info,
};
use ndarray::{
    Array2,
    ArrayView2,
};
pub use pvalues::PadjMethod;

use crate::data_structs::{
    LayerShape,
    Layers,
    Penalty,
    Significance,
};
use crate::error::Result;
use crate::tools::NetworkEstimator;
use crate::utils::CorrelationMoments;

/// Native [`NetworkEstimator`].
#[derive(Debug, Clone)]
pub struct ShrinkageEstimator {
    /// Multiple-testing procedure for the adjusted p-values.
    pub padj:      PadjMethod,
    /// Spacing of the grid that seeds the two-layer risk minimization.
    pub grid_step: f64,
    /// Iteration cap of the Nelder-Mead refinement.
    pub max_iters: u64,
}

impl ShrinkageEstimator {
    pub fn new(
        padj: PadjMethod,
        grid_step: f64,
        max_iters: u64,
    ) -> Self {
        Self {
            padj,
            grid_step,
            max_iters,
        }
    }

    pub fn with_padj(
        mut self,
        padj: PadjMethod,
    ) -> Self {
        self.padj = padj;
        self
    }
}

impl Default for ShrinkageEstimator {
    fn default() -> Self {
        Self {
            padj:      PadjMethod::BenjaminiHochberg,
            grid_step: 0.05,
            max_iters: 500,
        }
    }
}

impl NetworkEstimator for ShrinkageEstimator {
    fn estimate_penalty(
        &self,
        layers: &Layers,
    ) -> Result<Penalty> {
        let data = layers.concatenated()?;
        let moments = CorrelationMoments::from_standardized(data.view())?;

        let penalty = match layers {
            Layers::Single(_) => {
                Penalty::Single {
                    lambda: penalty::single_lambda(&moments),
                }
            },
            Layers::Paired(a, _) => {
                let terms = penalty::RiskTerms::from_moments(&moments, a.n_features());
                let (lambda_a, lambda_b) =
                    penalty::paired_lambdas(&terms, self.grid_step, self.max_iters)?;
                Penalty::Paired { lambda_a, lambda_b }
            },
        };
        info!("Estimated shrinkage intensities: {:?}", penalty.lambdas());
        Ok(penalty)
    }

    fn partial_correlation(
        &self,
        layers: &Layers,
        penalty: &Penalty,
    ) -> Result<Array2<f64>> {
        let data = layers.concatenated()?;
        let shape = layers.shape();
        let sigma = partial::shrunk_covariance(data.view(), &shape, penalty);
        let precision = partial::precision(&sigma)?;
        debug!("Inverted {0}x{0} shrunk covariance", shape.n_features());
        Ok(partial::partial_from_precision(&precision))
    }

    fn significance(
        &self,
        partial_correlation: ArrayView2<'_, f64>,
        shape: &LayerShape,
        penalty: &Penalty,
    ) -> Result<Significance> {
        let p_values = pvalues::raw_p_values(partial_correlation, shape, penalty)?;
        let adjusted = pvalues::adjust(&p_values, self.padj);
        Ok(Significance { p_values, adjusted })
    }
}
