mod dragon;
mod ggm;
mod simulate;
mod utils;

use clap::{
    Parser,
    Subcommand,
};
use dragon::DragonArgs;
use ggm::GgmArgs;
use pcornet::exports::anyhow;
use simulate::SimulateArgs;
use utils::UtilsArgs;

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,)]
struct Cli {
    #[command(subcommand)]
    command: MainMenu,
}

#[derive(Subcommand, Debug)]
enum MainMenu {
    /// Single-layer Gaussian graphical model.
    Ggm {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  GgmArgs,
    },

    /// Two-layer network with one shrinkage intensity per layer.
    Dragon {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  DragonArgs,
    },

    /// Write a seeded standard-normal matrix for trying out the drivers.
    Simulate {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  SimulateArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        MainMenu::Ggm { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Dragon { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Simulate { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
    }
    Ok(())
}
