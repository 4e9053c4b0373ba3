use std::path::{
    Path,
    PathBuf,
};

use ndarray::Array2;
use pcornet::prelude::*;
use rstest::fixture;
use tempfile::TempDir;

pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn path(
        &self,
        name: &str,
    ) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(
        &self,
        name: &str,
        matrix: &Array2<f64>,
    ) -> PathBuf {
        let path = self.path(name);
        save_matrix(matrix.view(), &path).unwrap();
        path
    }

    /// Config whose inputs and outputs all live inside the workspace.
    pub fn config(&self) -> PipelineConfig {
        PipelineConfig {
            input_x: self.path("X.npy"),
            input_a: self.path("XA.npy"),
            input_b: self.path("XB.npy"),
            ..PipelineConfig::default()
        }
        .with_output_dir(self.dir.path())
    }
}

#[fixture]
pub fn workspace() -> Workspace {
    Workspace {
        dir: tempfile::tempdir().unwrap(),
    }
}

#[allow(dead_code)]
pub fn outputs_exist(config: &PipelineConfig) -> bool {
    [&config.par_cor, &config.p_vals, &config.adj_p_vals]
        .iter()
        .all(|p| Path::new(p).is_file())
}
