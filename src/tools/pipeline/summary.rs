use std::io::{
    BufWriter,
    Write,
};
use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::{
    EdgeKind,
    NetworkResult,
    Penalty,
};
use crate::error::{
    NetError,
    Result,
};
use crate::io::StagedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Ggm,
    Dragon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputPaths {
    pub par_cor:    PathBuf,
    pub p_vals:     PathBuf,
    pub adj_p_vals: PathBuf,
}

/// What a finished run reports back to the operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub mode:         RunMode,
    pub n_samples:    usize,
    pub widths:       Vec<usize>,
    pub penalty:      Penalty,
    pub alpha:        f64,
    pub n_edges:      usize,
    pub within_edges: usize,
    pub cross_edges:  usize,
    pub outputs:      OutputPaths,
}

impl RunSummary {
    pub fn from_result(
        mode: RunMode,
        result: &NetworkResult,
        alpha: f64,
        outputs: OutputPaths,
    ) -> Self {
        let edges = result.significant_edges(alpha);
        let cross_edges = edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Cross)
            .count();

        Self {
            mode,
            n_samples: result.shape.n_samples,
            widths: result.shape.widths.clone(),
            penalty: result.penalty,
            alpha,
            n_edges: edges.len(),
            within_edges: edges.len() - cross_edges,
            cross_edges,
            outputs,
        }
    }

    /// Serializes the summary into a [`StagedFile`] for `path`.
    pub fn stage_json<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<StagedFile> {
        let path = path.as_ref();
        let mut staged = StagedFile::new(path)?;
        {
            let mut writer = BufWriter::new(staged.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, self)
                .map_err(|e| NetError::storage(path, e))?;
            writer.flush().map_err(|e| NetError::storage(path, e))?;
        }
        Ok(staged)
    }
}
