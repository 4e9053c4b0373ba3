use ndarray::{
    Array2,
    ArrayView2,
};

use crate::data_structs::{
    LayerShape,
    Layers,
    Penalty,
    Significance,
};
use crate::error::Result;

/// The three operations a partial-correlation backend has to provide.
///
/// Every call receives standardized data (or only the dimensions of it, for
/// significance) and must not keep state between calls.
pub trait NetworkEstimator {
    /// Shrinkage intensity per layer: [`Penalty::Single`] for single
    /// layers, [`Penalty::Paired`] for paired layers. Both paired penalties
    /// come out of one joint estimation.
    fn estimate_penalty(
        &self,
        layers: &Layers,
    ) -> Result<Penalty>;

    /// Square, symmetric partial-correlation matrix over the concatenated
    /// feature space of `layers`.
    fn partial_correlation(
        &self,
        layers: &Layers,
        penalty: &Penalty,
    ) -> Result<Array2<f64>>;

    /// Raw and adjusted p-values for every off-diagonal entry of
    /// `partial_correlation`.
    fn significance(
        &self,
        partial_correlation: ArrayView2<'_, f64>,
        shape: &LayerShape,
        penalty: &Penalty,
    ) -> Result<Significance>;
}

impl<E: NetworkEstimator + ?Sized> NetworkEstimator for Box<E> {
    fn estimate_penalty(
        &self,
        layers: &Layers,
    ) -> Result<Penalty> {
        (**self).estimate_penalty(layers)
    }

    fn partial_correlation(
        &self,
        layers: &Layers,
        penalty: &Penalty,
    ) -> Result<Array2<f64>> {
        (**self).partial_correlation(layers, penalty)
    }

    fn significance(
        &self,
        partial_correlation: ArrayView2<'_, f64>,
        shape: &LayerShape,
        penalty: &Penalty,
    ) -> Result<Significance> {
        (**self).significance(partial_correlation, shape, penalty)
    }
}
