//! Numeric helpers shared by the estimators and the pipeline.
//!
//! - Column standardization (the pipeline's normalizer).
//! - Sample correlation matrix together with the variance of each entry,
//!   the raw material of shrinkage intensity estimation.
//! - Symmetry and range checks used to validate estimator output.
pub mod stats;

pub use stats::*;
