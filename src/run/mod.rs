//! Build, lay out and write a median-joining network from an input alignment.

use crate::layout::{Canvas, ForceLayout, LayoutArgs};
use crate::{sequence, utils};
#[cfg(feature = "cli")]
use clap::Parser;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use haplonet_network::median_joining::MAX_ITERATIONS;
use haplonet_network::{BuildArgs, Haplotype, MedianJoining, Network, Sampling};
use indoc::formatdoc;
use itertools::Itertools;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use strum::{EnumIter, EnumProperty, IntoEnumIterator};

// ----------------------------------------------------------------------------
// Run
// ----------------------------------------------------------------------------

/// Build, lay out and write a median-joining network.
///
/// Reads the `input` alignment, collapses it into haplotypes, builds the network, lays it out on
/// the canvas and writes every [`Output`] to the `output_dir`. An empty network is written but not
/// laid out, there is nothing to display.
///
/// ## Examples
///
/// ```rust
/// use haplonet::run::{run, RunArgs};
/// use indoc::indoc;
///
/// let dir = tempfile::tempdir()?;
/// let input = dir.path().join("alignment.fasta");
/// std::fs::write(&input, indoc! {"
///     >s1
///     TAAA
///     >s2
///     ATAA
///     >s3
///     AATA
/// "})?;
///
/// let args = RunArgs { input, output_dir: dir.path().join("out"), ..Default::default() };
/// let network = run(&args)?;
/// assert_eq!(network.median_count(), 1);
/// assert!(dir.path().join("out").join("network.json").exists());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn run(args: &RunArgs) -> Result<Network, Report> {
    // ------------------------------------------------------------------------
    // Ingest

    info!("Reading alignment: {:?}", args.input);
    let records = sequence::read_fasta(&args.input)?;
    let haplotypes = sequence::haplotypes(&records);

    // ------------------------------------------------------------------------
    // Build

    info!("Building median-joining network (epsilon={}).", args.epsilon);
    let mut network = MedianJoining::new(&haplotypes, args.build_args())?.run()?;

    // ------------------------------------------------------------------------
    // Layout

    if network.is_empty() {
        warn!("The network is empty, nothing to display.");
    } else {
        let mut layout = ForceLayout::new(args.canvas())?;
        layout.set_args(args.layout_args());
        layout.run(&mut network)?;
    }

    // ------------------------------------------------------------------------
    // Export

    let output_dir = utils::create_dir(&args.output_dir)?;
    for output in Output::iter() {
        let path = output.path(&output_dir)?;
        match output {
            Output::Network | Output::Dot => network.write(&path)?,
            Output::Haplotypes => utils::write_table(&haplotype_rows(&haplotypes), &path)?,
            Output::Args => args.write(&path)?,
        }
    }

    let summary = utils::pretty_table(&summary_rows(&haplotypes, &network)?);
    info!(
        "{}",
        formatdoc! {"
            Summary:
            {summary}
            Outputs were written to: {output_dir:?}"
        }
    );

    Ok(network)
}

/// Returns the haplotype table: id, count and sample names.
fn haplotype_rows(haplotypes: &[Haplotype]) -> Vec<Vec<String>> {
    let headers = ["id", "count", "samples"].map(String::from).to_vec();
    let rows = haplotypes
        .iter()
        .map(|h| vec![h.id.clone(), h.count.to_string(), h.samples.iter().join(",")]);
    std::iter::once(headers).chain(rows).collect()
}

/// Returns the summary table of the network.
fn summary_rows(haplotypes: &[Haplotype], network: &Network) -> Result<Vec<Vec<String>>, Report> {
    let headers = ["Haplotypes", "Nodes", "Median Vectors", "Edges", "Components"];
    let values = [
        haplotypes.len(),
        network.nodes.len(),
        network.median_count(),
        network.edges.len(),
        network.component_count()?,
    ];
    Ok(vec![
        headers.map(String::from).to_vec(),
        values.iter().map(|value| value.to_string()).collect(),
    ])
}

// ----------------------------------------------------------------------------
// Output
// ----------------------------------------------------------------------------

/// Files written by [`run`].
#[derive(Clone, Copy, Debug, EnumIter, EnumProperty, Eq, PartialEq)]
pub enum Output {
    #[strum(props(file_name = "network.json"))]
    Network,
    #[strum(props(file_name = "network.dot"))]
    Dot,
    #[strum(props(file_name = "haplotypes.tsv"))]
    Haplotypes,
    #[strum(props(file_name = "args.json"))]
    Args,
}

impl Output {
    /// Returns the path of this output in a directory.
    ///
    /// ```rust
    /// use haplonet::run::Output;
    /// use std::path::Path;
    /// assert_eq!(Output::Dot.path(Path::new("out"))?, Path::new("out/network.dot"));
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn path(&self, output_dir: &Path) -> Result<PathBuf, Report> {
        let file_name = self
            .get_str("file_name")
            .ok_or_else(|| eyre!("Output {self:?} has no file name."))?;
        Ok(output_dir.join(file_name))
    }
}

// ----------------------------------------------------------------------------
// RunArgs
// ----------------------------------------------------------------------------

/// Build a median-joining network from an input alignment.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
pub struct RunArgs {
    /// Input FASTA alignment.
    #[cfg_attr(feature = "cli", clap(short = 'i', long, required = true))]
    pub input: PathBuf,

    /// Output directory.
    ///
    /// If the directory does not exist, it will be created.
    #[cfg_attr(feature = "cli", clap(short = 'o', long, required = true))]
    pub output_dir: PathBuf,

    /// Feasible-link tolerance, in mutations.
    ///
    /// Higher values keep more near-minimal connections.
    #[cfg_attr(feature = "cli", arg(short = 'e', long, default_value_t = RunArgs::default().epsilon))]
    pub epsilon: usize,

    /// Maximum number of median-joining iterations.
    #[cfg_attr(feature = "cli", arg(long, default_value_t = RunArgs::default().max_iterations))]
    pub max_iterations: usize,

    /// Canvas width.
    #[cfg_attr(feature = "cli", arg(long, default_value_t = RunArgs::default().width))]
    pub width: f64,

    /// Canvas height.
    #[cfg_attr(feature = "cli", arg(long, default_value_t = RunArgs::default().height))]
    pub height: f64,

    /// Maximum number of layout iterations.
    #[cfg_attr(feature = "cli", arg(long, default_value_t = RunArgs::default().layout_iterations))]
    pub layout_iterations: usize,

    /// Number of nodes sampled to estimate the minimum median cost.
    #[cfg_attr(feature = "cli", arg(long, default_value_t = RunArgs::default().sample_nodes))]
    pub sample_nodes: usize,

    /// Number of neighbors sampled per node to estimate the minimum median cost.
    #[cfg_attr(feature = "cli", arg(long, default_value_t = RunArgs::default().sample_neighbors))]
    pub sample_neighbors: usize,

    /// Number of second neighbors sampled per neighbor to estimate the minimum median cost.
    #[cfg_attr(feature = "cli", arg(long, default_value_t = RunArgs::default().sample_second_neighbors))]
    pub sample_second_neighbors: usize,
}

impl Default for RunArgs {
    fn default() -> Self {
        let sampling = Sampling::default();
        let canvas = Canvas::default();
        RunArgs {
            input: PathBuf::new(),
            output_dir: PathBuf::new(),
            epsilon: 0,
            max_iterations: MAX_ITERATIONS,
            width: canvas.width,
            height: canvas.height,
            layout_iterations: LayoutArgs::default().max_iterations,
            sample_nodes: sampling.nodes,
            sample_neighbors: sampling.neighbors,
            sample_second_neighbors: sampling.second_neighbors,
        }
    }
}

impl RunArgs {
    /// Returns the [`BuildArgs`] of the median-joining builder.
    pub fn build_args(&self) -> BuildArgs {
        BuildArgs {
            epsilon: self.epsilon,
            max_iterations: self.max_iterations,
            sampling: Sampling {
                nodes: self.sample_nodes,
                neighbors: self.sample_neighbors,
                second_neighbors: self.sample_second_neighbors,
            },
        }
    }

    pub fn canvas(&self) -> Canvas {
        Canvas { width: self.width, height: self.height }
    }

    pub fn layout_args(&self) -> LayoutArgs {
        LayoutArgs { max_iterations: self.layout_iterations, ..Default::default() }
    }

    /// Reads [`RunArgs`] from a JSON file.
    pub fn read<P>(path: &P) -> Result<RunArgs, Report>
    where
        P: AsRef<Path> + Debug,
    {
        let input = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read run arguments: {path:?}."))?;
        let run_args = serde_json::from_str(&input)
            .wrap_err_with(|| format!("Failed to deserialize run arguments: {input}"))?;
        Ok(run_args)
    }

    /// Write [`RunArgs`] to a JSON file.
    pub fn write<P>(&self, path: &P) -> Result<(), Report>
    where
        P: AsRef<Path> + Debug,
    {
        let output = serde_json::to_string_pretty(self)
            .wrap_err_with(|| format!("Failed to serialize run arguments: {self:?}"))?;
        std::fs::write(path, output)
            .wrap_err_with(|| format!("Failed to write run arguments: {path:?}"))?;
        Ok(())
    }
}
