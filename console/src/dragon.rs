use std::path::PathBuf;

use clap::Args;
use pcornet::exports::anyhow;
use pcornet::exports::anyhow::Context;
use pcornet::prelude::{
    Pipeline,
    PipelineConfig,
    ShrinkageEstimator,
};

use crate::utils::{
    check_input,
    report,
    OutputArgs,
    UtilsArgs,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct DragonArgs {
    #[arg(
        short = 'a',
        long,
        default_value = "data/XA.npy",
        help = "First layer, samples x features (.npy, float64)."
    )]
    layer_a: PathBuf,

    #[arg(
        short = 'b',
        long,
        default_value = "data/XB.npy",
        help = "Second layer on the same samples, in the same row order."
    )]
    layer_b: PathBuf,

    #[arg(
        long,
        default_value_t = 0.05,
        help_heading = "PENALTY",
        help = "Grid spacing of the initial search over the two intensities, \
                between 1e-4 and 1."
    )]
    grid_step: f64,

    #[arg(
        long,
        default_value_t = 500,
        help_heading = "PENALTY",
        help = "Iteration cap of the Nelder-Mead refinement."
    )]
    max_iters: u64,

    #[clap(flatten)]
    output: OutputArgs,
}

impl DragonArgs {
    pub fn run(
        &self,
        _utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        check_input(&self.layer_a)?;
        check_input(&self.layer_b)?;
        let mut config = PipelineConfig {
            input_a: self.layer_a.clone(),
            input_b: self.layer_b.clone(),
            ..PipelineConfig::default()
        };
        self.output.apply(&mut config)?;

        let estimator = ShrinkageEstimator::new(
            self.output.pmethod.into(),
            self.grid_step,
            self.max_iters,
        );
        let summary = Pipeline::new(estimator)
            .run_dragon(&config)
            .with_context(|| {
                format!(
                    "DRAGON run on {} and {} failed",
                    self.layer_a.display(),
                    self.layer_b.display()
                )
            })?;
        report(&summary);
        Ok(())
    }
}
