use log::debug;
use ndarray::{
    concatenate,
    Array1,
    Array2,
    ArrayView2,
    Axis,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::error::{
    NetError,
    Result,
};

/// Sample matrix (rows = samples, columns = features) whose columns have
/// sample mean 0 and sample standard deviation 1.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardizedMatrix {
    data:     Array2<f64>,
    /// Column means of the raw matrix.
    means:    Array1<f64>,
    /// Column sample standard deviations of the raw matrix.
    std_devs: Array1<f64>,
}

impl StandardizedMatrix {
    pub(crate) fn new_unchecked(
        data: Array2<f64>,
        means: Array1<f64>,
        std_devs: Array1<f64>,
    ) -> Self {
        Self {
            data,
            means,
            std_devs,
        }
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    pub fn n_samples(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.data.ncols()
    }

    pub fn means(&self) -> &Array1<f64> {
        &self.means
    }

    pub fn std_devs(&self) -> &Array1<f64> {
        &self.std_devs
    }
}

/// Dimensions of a run: the shared sample count and the width of every
/// layer, in column order of the concatenated feature space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerShape {
    pub n_samples: usize,
    pub widths:    Vec<usize>,
}

impl LayerShape {
    pub fn single(
        n_samples: usize,
        p: usize,
    ) -> Self {
        Self {
            n_samples,
            widths: vec![p],
        }
    }

    pub fn paired(
        n_samples: usize,
        p_a: usize,
        p_b: usize,
    ) -> Self {
        Self {
            n_samples,
            widths: vec![p_a, p_b],
        }
    }

    /// Total number of features (side of the network matrices).
    pub fn n_features(&self) -> usize {
        self.widths.iter().sum()
    }

    /// Index of the layer that owns feature `index` of the concatenated
    /// space.
    pub fn layer_of(
        &self,
        index: usize,
    ) -> usize {
        let mut upper = 0;
        for (layer, width) in self.widths.iter().enumerate() {
            upper += width;
            if index < upper {
                return layer;
            }
        }
        self.widths.len().saturating_sub(1)
    }
}

/// Standardized input of one run.
#[derive(Debug, Clone)]
pub enum Layers {
    Single(StandardizedMatrix),
    /// Two feature layers measured on the same samples.
    Paired(StandardizedMatrix, StandardizedMatrix),
}

impl Layers {
    pub fn single(x: StandardizedMatrix) -> Self {
        Layers::Single(x)
    }

    /// Pairs two layers, checking that they share the sample axis.
    pub fn paired(
        a: StandardizedMatrix,
        b: StandardizedMatrix,
    ) -> Result<Self> {
        if a.n_samples() != b.n_samples() {
            return Err(NetError::ShapeMismatch {
                left:  a.n_samples(),
                right: b.n_samples(),
            });
        }
        Ok(Layers::Paired(a, b))
    }

    pub fn shape(&self) -> LayerShape {
        match self {
            Layers::Single(x) => LayerShape::single(x.n_samples(), x.n_features()),
            Layers::Paired(a, b) => {
                LayerShape::paired(a.n_samples(), a.n_features(), b.n_features())
            },
        }
    }

    /// All layers side by side: n x (pA + pB) for paired input.
    pub fn concatenated(&self) -> Result<Array2<f64>> {
        match self {
            Layers::Single(x) => Ok(x.view().to_owned()),
            Layers::Paired(a, b) => {
                debug!(
                    "Concatenating layers: {} + {} features",
                    a.n_features(),
                    b.n_features()
                );
                concatenate(Axis(1), &[a.view(), b.view()])
                    .map_err(|e| NetError::InvalidInput(e.to_string()))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{
        array,
        Array1,
    };

    use super::*;

    fn standardized(data: Array2<f64>) -> StandardizedMatrix {
        let p = data.ncols();
        StandardizedMatrix::new_unchecked(data, Array1::zeros(p), Array1::ones(p))
    }

    #[test]
    fn layer_of_walks_widths() {
        let shape = LayerShape::paired(10, 3, 2);
        assert_eq!(shape.n_features(), 5);
        assert_eq!(shape.layer_of(0), 0);
        assert_eq!(shape.layer_of(2), 0);
        assert_eq!(shape.layer_of(3), 1);
        assert_eq!(shape.layer_of(4), 1);
    }

    #[test]
    fn paired_rejects_row_mismatch() {
        let a = standardized(Array2::zeros((4, 2)));
        let b = standardized(Array2::zeros((5, 2)));
        let err = Layers::paired(a, b).unwrap_err();
        assert!(matches!(
            err,
            NetError::ShapeMismatch { left: 4, right: 5 }
        ));
    }

    #[test]
    fn concatenation_keeps_column_order() {
        let a = standardized(array![[1.0, 2.0], [3.0, 4.0]]);
        let b = standardized(array![[5.0], [6.0]]);
        let layers = Layers::paired(a, b).unwrap();
        assert_eq!(layers.shape(), LayerShape::paired(2, 2, 1));
        assert_eq!(
            layers.concatenated().unwrap(),
            array![[1.0, 2.0, 5.0], [3.0, 4.0, 6.0]]
        );
    }
}
