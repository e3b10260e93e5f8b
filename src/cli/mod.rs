//! [Command-line interface](Cli) (CLI) of the main binary.

use crate::run::RunArgs;
use crate::Verbosity;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// CLI Entry Point
// ----------------------------------------------------------------------------

/// The command-line interface (CLI).
/// ---
/// The CLI is intended for parsing user input from the command-line in the main function. This is achieved with the `parse` function, which parses the command line arguments from [`std::env::args`](https://doc.rust-lang.org/std/env/fn.args.html).
/// ```no_run
/// use clap::Parser;
/// let args = haplonet::Cli::parse();
/// ```
/// The command-line arguments from `std::env::args` are simply a vector of space separated strings. Here is a manual example of setting the command-line input:
/// ```rust
/// use clap::Parser;
/// use haplonet::cli::{Cli, Command};
///
/// let input = ["haplonet", "run", "--input", "alignment.fasta", "--output-dir", "out", "--epsilon", "1"];
/// let args = Cli::parse_from(input);
/// let Command::Run(run_args) = &args.command;
/// assert_eq!(run_args.epsilon, 1);
/// assert_eq!(run_args.max_iterations, 20);
/// serde_json::to_string_pretty(&args)?;
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(Debug, Deserialize, Parser, Serialize)]
#[clap(name = "haplonet", author, version)]
#[clap(about = "haplonet builds median-joining networks from aligned haplotype sequences.")]
pub struct Cli {
    #[clap(subcommand)]
    /// Pass CLI arguments to a particular [Command].
    #[clap(help = "Set the command.")]
    pub command: Command,

    /// Set the output [Verbosity] level.
    #[clap(short = 'v', long)]
    #[clap(value_enum, default_value_t = Verbosity::default())]
    #[clap(hide_possible_values = false)]
    #[clap(global = true)]
    #[clap(help = "Set the output verbosity level.")]
    pub verbosity: Verbosity,
}

/// CLI [commands](#variants). Used to decide which runtime [Command](#variants) the CLI arguments should be passed to.
#[derive(Debug, Deserialize, Serialize, Subcommand)]
pub enum Command {
    /// Pass CLI arguments to [run](crate::run::run()).
    #[clap(about = "Build, lay out and write a median-joining network.")]
    Run(RunArgs),
}
