//! Orchestration of a network run.
//!
//! A run is strictly linear: load -> standardize -> estimate penalty ->
//! estimate partial correlation -> estimate significance -> persist. Any
//! failing step aborts the run. Outputs are staged next to their
//! destinations once everything is computed and committed together, so a
//! failed run leaves no partial output.
//!
//! The [`Pipeline`] never trusts its estimator: every intermediate result is
//! checked (penalty arity and range, matrix shape, symmetry, p-value range,
//! adjusted >= raw) and a violation aborts the run with
//! [`NetError::Estimation`].
mod config;
mod summary;

pub use config::PipelineConfig;
use log::{
    debug,
    info,
};
use ndarray::{
    Array2,
    ArrayView2,
};
pub use summary::{
    OutputPaths,
    RunMode,
    RunSummary,
};

use crate::data_structs::{
    LayerShape,
    Layers,
    NetworkResult,
    Penalty,
    Significance,
};
use crate::error::{
    NetError,
    Result,
};
use crate::io::{
    commit_all,
    load_matrix,
    stage_matrix,
};
use crate::tools::NetworkEstimator;
use crate::utils::{
    max_asymmetry,
    standardize,
};

/// Largest tolerated `|m[i, j] - m[j, i]|` in estimator output.
pub const SYMMETRY_TOLERANCE: f64 = 1e-8;

pub struct Pipeline<E: NetworkEstimator> {
    estimator: E,
}

impl<E: NetworkEstimator> Pipeline<E> {
    pub fn new(estimator: E) -> Self {
        Self { estimator }
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Penalty, partial correlation and significance for standardized
    /// `layers`, each validated before the next step starts.
    pub fn run(
        &self,
        layers: Layers,
    ) -> Result<NetworkResult> {
        let shape = layers.shape();
        info!(
            "Estimating network: {} samples, layer widths {:?}",
            shape.n_samples, shape.widths
        );

        let penalty = self.estimator.estimate_penalty(&layers)?;
        check_penalty(&penalty, &shape)?;
        info!("lambdas = {:?}", penalty.lambdas());

        let partial_correlation = self
            .estimator
            .partial_correlation(&layers, &penalty)?;
        check_correlation(partial_correlation.view(), &shape)?;
        debug!("Partial correlation matrix validated");

        let significance = self.estimator.significance(
            partial_correlation.view(),
            &shape,
            &penalty,
        )?;
        check_significance(&significance, &shape)?;
        debug!("Significance matrices validated");

        Ok(NetworkResult {
            shape,
            penalty,
            partial_correlation,
            significance,
        })
    }

    /// Single-layer driver: `config.input_x` -> network -> outputs.
    pub fn run_ggm(
        &self,
        config: &PipelineConfig,
    ) -> Result<RunSummary> {
        let x = load_matrix(&config.input_x)?;
        let layers = Layers::single(standardize(x.view())?);
        let result = self.run(layers)?;
        self.finish(RunMode::Ggm, &result, config)
    }

    /// Two-layer driver: `config.input_a` + `config.input_b` -> network ->
    /// outputs.
    pub fn run_dragon(
        &self,
        config: &PipelineConfig,
    ) -> Result<RunSummary> {
        let xa = load_matrix(&config.input_a)?;
        let xb = load_matrix(&config.input_b)?;
        if xa.nrows() != xb.nrows() {
            return Err(NetError::ShapeMismatch {
                left:  xa.nrows(),
                right: xb.nrows(),
            });
        }
        let layers = Layers::paired(standardize(xa.view())?, standardize(xb.view())?)?;
        let result = self.run(layers)?;
        self.finish(RunMode::Dragon, &result, config)
    }

    /// Stages every output, then commits them together. A failure at any
    /// point leaves none of this run's files behind.
    fn finish(
        &self,
        mode: RunMode,
        result: &NetworkResult,
        config: &PipelineConfig,
    ) -> Result<RunSummary> {
        let summary = RunSummary::from_result(mode, result, config.alpha, OutputPaths {
            par_cor:    config.par_cor.clone(),
            p_vals:     config.p_vals.clone(),
            adj_p_vals: config.adj_p_vals.clone(),
        });

        let mut staged = vec![
            stage_matrix(result.partial_correlation.view(), &config.par_cor)?,
            stage_matrix(result.significance.adjusted.view(), &config.adj_p_vals)?,
            stage_matrix(result.significance.p_values.view(), &config.p_vals)?,
        ];
        if let Some(path) = &config.summary_path {
            staged.push(summary.stage_json(path)?);
        }
        let targets = staged
            .iter()
            .map(|file| file.target().display().to_string())
            .collect::<Vec<_>>();
        commit_all(staged)?;
        info!("Saved {}", targets.join(", "));

        Ok(summary)
    }
}

fn check_penalty(
    penalty: &Penalty,
    shape: &LayerShape,
) -> Result<()> {
    if penalty.arity() != shape.widths.len() {
        return Err(NetError::Estimation(format!(
            "{} penalties for {} layers",
            penalty.arity(),
            shape.widths.len()
        )));
    }
    if let Some(bad) = penalty
        .lambdas()
        .into_iter()
        .find(|l| !(0.0..=1.0).contains(l))
    {
        return Err(NetError::Estimation(format!(
            "penalty {} outside [0, 1]",
            bad
        )));
    }
    Ok(())
}

fn check_square(
    name: &str,
    m: ArrayView2<'_, f64>,
    shape: &LayerShape,
) -> Result<()> {
    let p = shape.n_features();
    if m.dim() != (p, p) {
        return Err(NetError::Estimation(format!(
            "{} is {}x{}, expected {}x{}",
            name,
            m.nrows(),
            m.ncols(),
            p,
            p
        )));
    }
    if m.iter().any(|v| !v.is_finite()) {
        return Err(NetError::Estimation(format!(
            "{} contains non-finite values",
            name
        )));
    }
    Ok(())
}

fn check_correlation(
    m: ArrayView2<'_, f64>,
    shape: &LayerShape,
) -> Result<()> {
    check_square("partial correlation", m, shape)?;
    let asymmetry = max_asymmetry(m);
    if asymmetry > SYMMETRY_TOLERANCE {
        return Err(NetError::Estimation(format!(
            "partial correlation is not symmetric (max deviation {:e})",
            asymmetry
        )));
    }
    Ok(())
}

fn check_unit_range(
    name: &str,
    m: &Array2<f64>,
) -> Result<()> {
    match m.iter().find(|v| !(0.0..=1.0).contains(*v)) {
        Some(bad) => {
            Err(NetError::Estimation(format!(
                "{} has value {} outside [0, 1]",
                name, bad
            )))
        },
        None => Ok(()),
    }
}

fn check_significance(
    significance: &Significance,
    shape: &LayerShape,
) -> Result<()> {
    check_square("p-values", significance.p_values.view(), shape)?;
    check_square("adjusted p-values", significance.adjusted.view(), shape)?;
    check_unit_range("p-values", &significance.p_values)?;
    check_unit_range("adjusted p-values", &significance.adjusted)?;

    let violation = significance
        .p_values
        .indexed_iter()
        .find(|(idx, raw)| significance.adjusted[*idx] < **raw);
    if let Some(((i, j), raw)) = violation {
        return Err(NetError::Estimation(format!(
            "adjusted p-value {} below raw {} at ({}, {})",
            significance.adjusted[[i, j]],
            raw,
            i,
            j
        )));
    }
    Ok(())
}
