use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};

/// File locations and reporting options of a single run.
///
/// Defaults mirror the layout the analysis notebooks use: inputs and outputs
/// side by side under `data/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Matrix of the single-layer (GGM) driver.
    pub input_x:      PathBuf,
    /// First layer of the two-layer (DRAGON) driver.
    pub input_a:      PathBuf,
    /// Second layer of the two-layer (DRAGON) driver.
    pub input_b:      PathBuf,
    pub par_cor:      PathBuf,
    pub p_vals:       PathBuf,
    pub adj_p_vals:   PathBuf,
    /// Adjusted p-value cutoff used when counting edges for the summary.
    pub alpha:        f64,
    /// Where to write the JSON run summary, if anywhere.
    pub summary_path: Option<PathBuf>,
}

impl PipelineConfig {
    /// Same inputs, every output placed in `dir` under its default name.
    pub fn with_output_dir(
        mut self,
        dir: impl Into<PathBuf>,
    ) -> Self {
        let dir = dir.into();
        self.par_cor = dir.join("par_cor.npy");
        self.p_vals = dir.join("p_vals.npy");
        self.adj_p_vals = dir.join("adj_p_vals.npy");
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_x:      PathBuf::from("data/X.npy"),
            input_a:      PathBuf::from("data/XA.npy"),
            input_b:      PathBuf::from("data/XB.npy"),
            par_cor:      PathBuf::from("data/par_cor.npy"),
            p_vals:       PathBuf::from("data/p_vals.npy"),
            adj_p_vals:   PathBuf::from("data/adj_p_vals.npy"),
            alpha:        0.05,
            summary_path: None,
        }
    }
}
