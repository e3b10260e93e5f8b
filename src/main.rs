use clap::Parser;
use color_eyre::eyre::{Report, Result};
use haplonet::cli::{Cli, Command};

fn main() -> Result<(), Report> {
    let args = Cli::parse();
    color_eyre::install()?;

    // RUST_LOG directives apply on top of --verbosity
    env_logger::Builder::new().filter_level(args.verbosity.into()).parse_default_env().init();

    match args.command {
        Command::Run(run_args) => {
            let network = haplonet::run::run(&run_args)?;
            log::debug!("Done: {} nodes, {} edges.", network.nodes.len(), network.edges.len());
        }
    }

    Ok(())
}
