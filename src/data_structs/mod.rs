//! Core data types shared by the I/O layer, the estimators and the pipeline.
//!
//! * [`StandardizedMatrix`] - a column-standardized sample matrix; only the
//!   normalizer in [`crate::utils::stats`] can build one.
//! * [`Layers`] and [`LayerShape`] - the one or two feature layers of a run,
//!   and their dimensions.
//! * [`Penalty`], [`Significance`], [`NetworkResult`] - estimator outputs.
mod layers;
mod network;

pub use layers::{
    LayerShape,
    Layers,
    StandardizedMatrix,
};
pub use network::{
    Edge,
    EdgeKind,
    NetworkResult,
    Penalty,
    Significance,
};
