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
pub(crate) struct GgmArgs {
    #[arg(
        short = 'i',
        long,
        default_value = "data/X.npy",
        help = "Samples x features matrix (.npy, float64)."
    )]
    input: PathBuf,

    #[clap(flatten)]
    output: OutputArgs,
}

impl GgmArgs {
    pub fn run(
        &self,
        _utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        check_input(&self.input)?;
        let mut config = PipelineConfig {
            input_x: self.input.clone(),
            ..PipelineConfig::default()
        };
        self.output.apply(&mut config)?;

        let estimator = ShrinkageEstimator::default().with_padj(self.output.pmethod.into());
        let summary = Pipeline::new(estimator)
            .run_ggm(&config)
            .with_context(|| format!("GGM run on {} failed", self.input.display()))?;
        report(&summary);
        Ok(())
    }
}
