use itertools::Itertools;
use ndarray::Array2;
use serde::{
    Deserialize,
    Serialize,
};

use super::LayerShape;

/// Shrinkage intensities of a run, one per layer. Values lie in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Penalty {
    Single { lambda: f64 },
    Paired { lambda_a: f64, lambda_b: f64 },
}

impl Penalty {
    pub fn lambdas(&self) -> Vec<f64> {
        match *self {
            Penalty::Single { lambda } => vec![lambda],
            Penalty::Paired { lambda_a, lambda_b } => vec![lambda_a, lambda_b],
        }
    }

    /// Penalty of the given layer.
    pub fn lambda_for(
        &self,
        layer: usize,
    ) -> f64 {
        match *self {
            Penalty::Single { lambda } => lambda,
            Penalty::Paired { lambda_a, .. } if layer == 0 => lambda_a,
            Penalty::Paired { lambda_b, .. } => lambda_b,
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Penalty::Single { .. } => 1,
            Penalty::Paired { .. } => 2,
        }
    }
}

/// Raw and multiple-testing-adjusted p-values of a partial-correlation
/// matrix. Diagonal entries carry no hypothesis and are set to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Significance {
    pub p_values: Array2<f64>,
    pub adjusted: Array2<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Within,
    Cross,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source:      usize,
    pub target:      usize,
    pub kind:        EdgeKind,
    pub coefficient: f64,
    pub p_value:     f64,
    pub adjusted:    f64,
}

/// Everything one run produces before it is persisted.
#[derive(Debug, Clone)]
pub struct NetworkResult {
    pub shape:               LayerShape,
    pub penalty:             Penalty,
    pub partial_correlation: Array2<f64>,
    pub significance:        Significance,
}

impl NetworkResult {
    /// Upper-triangle edges whose adjusted p-value is at most `alpha`.
    pub fn significant_edges(
        &self,
        alpha: f64,
    ) -> Vec<Edge> {
        let p = self.shape.n_features();
        (0..p)
            .tuple_combinations()
            .filter(|&(i, j)| self.significance.adjusted[[i, j]] <= alpha)
            .map(|(i, j)| {
                let kind = if self.shape.layer_of(i) == self.shape.layer_of(j) {
                    EdgeKind::Within
                }
                else {
                    EdgeKind::Cross
                };
                Edge {
                    source: i,
                    target: j,
                    kind,
                    coefficient: self.partial_correlation[[i, j]],
                    p_value: self.significance.p_values[[i, j]],
                    adjusted: self.significance.adjusted[[i, j]],
                }
            })
            .collect()
    }
}
