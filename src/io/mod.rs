//! File input and output.
//!
//! Matrices are stored as NumPy `.npy` files (2-D; any float or integer dtype on input, float64 on output), the format the
//! upstream analysis notebooks read and write with `np.load`/`np.save`.
pub mod npy;
pub mod staged;

pub use npy::{
    load_matrix,
    save_matrix,
    stage_matrix,
};
pub use staged::{
    commit_all,
    StagedFile,
};
