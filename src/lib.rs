//! Partial-correlation networks from shrunk covariance estimates.
//!
//! Two analyses are supported:
//!
//! - **GGM**: a single data matrix (samples x features) is turned into a
//!   Gaussian graphical model with one shrinkage intensity.
//! - **DRAGON**: two matrices measured on the same samples are joined into
//!   one network, each layer shrunk with its own intensity.
//!
//! Both produce a partial-correlation matrix, per-edge p-values, and
//! multiple-testing-adjusted p-values, persisted as `.npy` files.
//!
//! ```no_run
//! use pcornet::prelude::*;
//!
//! let pipeline = Pipeline::new(ShrinkageEstimator::default());
//! let summary = pipeline.run_ggm(&PipelineConfig::default())?;
//! println!("{} edges", summary.n_edges);
//! # Ok::<(), NetError>(())
//! ```
pub mod data_structs;
pub mod error;
pub mod exports;
pub mod io;
pub mod prelude;
pub mod tools;
pub mod utils;

pub use error::{
    NetError,
    Result,
};
