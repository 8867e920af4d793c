mod plot;
mod util;

use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::Parser;
use log::info;

/// Principal component analysis of a comma separated numeric file
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Number of components to keep; keeps all when omitted
    #[arg(short = 'k', long)]
    components: Option<usize>,

    /// Where to write the scatter plot of the first two components
    #[arg(short, long, default_value = "pca.png")]
    output: PathBuf,

    /// File containing data; reads stdin when omitted
    filename: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let reader = util::get_buff_reader(&cli.filename)?;
    let data = pca::dataset::from_reader(reader)?;
    info!(
        "loaded {} samples with {} features",
        data.height(),
        data.width(),
    );

    let model = pca::fit(&data, cli.components)?;
    for (i, variance) in model.explained_variance().iter().enumerate() {
        println!("pca{}: {}", i + 1, variance);
    }

    let projected = pca::project(&data, model.components())?;
    plot::scatter(&projected, &cli.output)?;
    info!("wrote {}", cli.output.display());
    Ok(())
}
