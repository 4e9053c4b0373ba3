//! Network estimation and the analysis drivers built on it.
//!
//! Key submodules:
//!
//! - [`estimator`]: the [`NetworkEstimator`] capability trait. The pipeline
//!   only ever talks to an estimator through its three operations (penalty,
//!   partial correlation, significance), so backends can be swapped or
//!   replaced by test doubles.
//! - [`shrinkage`]: the native backend, covariance shrinkage towards the
//!   diagonal with analytically chosen intensities (one per layer).
//! - [`pipeline`]: load, standardize, estimate, and persist, for the
//!   single-layer (GGM) and two-layer (DRAGON) drivers.
//! - [`simulate`]: seeded synthetic matrices for demos and tests.
pub mod estimator;
pub mod pipeline;
pub mod shrinkage;
pub mod simulate;

pub use estimator::NetworkEstimator;
