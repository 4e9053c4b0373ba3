use std::path::{
    Path,
    PathBuf,
};

use clap::{
    Args,
    ValueEnum,
};
use console::style;
use pcornet::exports::anyhow;
use pcornet::exports::log::LevelFilter;
use pcornet::exports::pretty_env_logger;
use pcornet::prelude::{
    PadjMethod,
    PipelineConfig,
    RunSummary,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct UtilsArgs {
    #[arg(
        short = 'v',
        long,
        action = clap::ArgAction::Count,
        help_heading = "LOGGING",
        help = "Increase verbosity (-v info, -vv debug, -vvv trace). RUST_LOG \
                is honored when no flag is given."
    )]
    pub verbose: u8,
}

impl UtilsArgs {
    pub fn setup(&self) -> anyhow::Result<()> {
        let mut builder = pretty_env_logger::formatted_builder();
        match self.verbose {
            0 => {
                if let Ok(filters) = std::env::var("RUST_LOG") {
                    builder.parse_filters(&filters);
                }
                else {
                    builder.filter_level(LevelFilter::Warn);
                }
            },
            1 => {
                builder.filter_level(LevelFilter::Info);
            },
            2 => {
                builder.filter_level(LevelFilter::Debug);
            },
            _ => {
                builder.filter_level(LevelFilter::Trace);
            },
        }
        builder.try_init()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum PadjArg {
    BH,
    BY,
    Bonf,
}

impl From<PadjArg> for PadjMethod {
    fn from(value: PadjArg) -> Self {
        match value {
            PadjArg::BH => PadjMethod::BenjaminiHochberg,
            PadjArg::BY => PadjMethod::BenjaminiYekutieli,
            PadjArg::Bonf => PadjMethod::Bonferroni,
        }
    }
}

/// Output and reporting options shared by both drivers.
#[derive(Args, Debug, Clone)]
pub(crate) struct OutputArgs {
    #[arg(
        long,
        default_value = "data/par_cor.npy",
        help_heading = "OUTPUT",
        help = "Where to write the partial-correlation matrix."
    )]
    pub par_cor: PathBuf,

    #[arg(
        long,
        default_value = "data/p_vals.npy",
        help_heading = "OUTPUT",
        help = "Where to write the raw p-values."
    )]
    pub p_vals: PathBuf,

    #[arg(
        long,
        default_value = "data/adj_p_vals.npy",
        help_heading = "OUTPUT",
        help = "Where to write the adjusted p-values."
    )]
    pub adj_p_vals: PathBuf,

    #[arg(
        long,
        help_heading = "OUTPUT",
        help = "Also write a JSON run summary to this path."
    )]
    pub summary: Option<PathBuf>,

    #[arg(
        long = "pmethod",
        value_enum,
        default_value_t = PadjArg::BH,
        help_heading = "TESTING",
        help = "Multiple-testing correction of the edge p-values."
    )]
    pub pmethod: PadjArg,

    #[arg(
        long,
        default_value_t = 0.05,
        help_heading = "TESTING",
        help = "Adjusted p-value cutoff used when counting edges in the summary."
    )]
    pub alpha: f64,
}

impl OutputArgs {
    pub fn apply(
        &self,
        config: &mut PipelineConfig,
    ) -> anyhow::Result<()> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(anyhow::anyhow!(
                "alpha must be in (0, 1], got {}",
                self.alpha
            ));
        }
        for path in [&self.par_cor, &self.p_vals, &self.adj_p_vals] {
            if path.is_dir() {
                return Err(anyhow::anyhow!(
                    "Output path {} is a directory.",
                    path.display()
                ));
            }
        }
        config.par_cor = self.par_cor.clone();
        config.p_vals = self.p_vals.clone();
        config.adj_p_vals = self.adj_p_vals.clone();
        config.alpha = self.alpha;
        config.summary_path = self.summary.clone();
        Ok(())
    }
}

pub(crate) fn check_input(path: &Path) -> anyhow::Result<()> {
    if !path.is_file() {
        eprintln!("Path {} is not a file.", style(path.display()).red());
        return Err(anyhow::anyhow!("Missing input {}", path.display()));
    }
    Ok(())
}

pub(crate) fn report(summary: &RunSummary) {
    println!(
        "{} samples, layer widths {:?}, lambdas {:?}",
        summary.n_samples,
        summary.widths,
        summary.penalty.lambdas()
    );
    println!(
        "{} edges at adjusted p < {} ({} within layers, {} across)",
        style(summary.n_edges).green().bold(),
        summary.alpha,
        summary.within_edges,
        summary.cross_edges
    );
    println!(
        "Saved {}, {}, {}",
        style(summary.outputs.par_cor.display()).cyan(),
        style(summary.outputs.adj_p_vals.display()).cyan(),
        style(summary.outputs.p_vals.display()).cyan()
    );
}
