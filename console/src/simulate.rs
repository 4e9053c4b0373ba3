use std::path::PathBuf;

use clap::Args;
use console::style;
use pcornet::exports::anyhow;
use pcornet::exports::log::info;
use pcornet::io::save_matrix;
use pcornet::tools::simulate::{
    linked_layers,
    standard_normal,
};

use crate::utils::UtilsArgs;

#[derive(Args, Debug, Clone)]
pub(crate) struct SimulateArgs {
    #[arg(
        short = 'o',
        long,
        default_value = "data/X.npy",
        help = "Output matrix (.npy). With --linked, the first layer."
    )]
    output: PathBuf,

    #[arg(short = 'n', long, default_value_t = 100, help = "Number of samples.")]
    n_samples: usize,

    #[arg(short = 'p', long, default_value_t = 5, help = "Number of features.")]
    n_features: usize,

    #[arg(long, default_value_t = 0, help = "Random seed.")]
    seed: u64,

    #[arg(
        long,
        help_heading = "LINKED LAYERS",
        help = "Write a second layer here whose first column shares a latent \
                factor with the first column of --output."
    )]
    linked: Option<PathBuf>,

    #[arg(
        long,
        default_value_t = 3,
        help_heading = "LINKED LAYERS",
        help = "Number of features of the second layer."
    )]
    linked_features: usize,

    #[arg(
        long,
        default_value_t = 0.5,
        help_heading = "LINKED LAYERS",
        help = "Noise added to the shared factor in each layer."
    )]
    noise: f64,
}

impl SimulateArgs {
    pub fn run(
        &self,
        _utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        if self.n_samples == 0 || self.n_features == 0 {
            return Err(anyhow::anyhow!("Matrix dimensions must be positive"));
        }

        match &self.linked {
            Some(second) => {
                if self.linked_features == 0 {
                    return Err(anyhow::anyhow!("Second layer needs at least one feature"));
                }
                let (a, b) = linked_layers(
                    self.n_samples,
                    self.n_features,
                    self.linked_features,
                    self.noise,
                    self.seed,
                );
                save_matrix(a.view(), &self.output)?;
                save_matrix(b.view(), second)?;
                info!("Linked layers written with seed {}", self.seed);
                println!(
                    "Wrote {} and {}",
                    style(self.output.display()).cyan(),
                    style(second.display()).cyan()
                );
            },
            None => {
                let x = standard_normal(self.n_samples, self.n_features, self.seed);
                save_matrix(x.view(), &self.output)?;
                info!("Matrix written with seed {}", self.seed);
                println!(
                    "Wrote {}x{} matrix to {}",
                    self.n_samples,
                    self.n_features,
                    style(self.output.display()).cyan()
                );
            },
        }
        Ok(())
    }
}
