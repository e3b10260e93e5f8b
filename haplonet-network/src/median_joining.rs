//! The median-joining builder: iterative refinement of the minimum spanning network.
//!
//! Each iteration recomputes the [`DistanceMatrix`] and the [`SpanningNetwork`] over the current
//! nodes, then either prunes obsolete median vectors or grows new ones from the quasi-medians of
//! feasible triplets. The builder stops when an iteration changes nothing ([`State::Converged`])
//! or after [`BuildArgs::max_iterations`] ([`State::MaxIterationsReached`]).

use crate::distance::DistanceMatrix;
use crate::msn::{self, SpanningNetwork};
use crate::quasi_median::{self, median_cost, quasi_medians, MAX_AMBIGUOUS_POSITIONS};
use crate::{Edge, Haplotype, Network, Node};
use color_eyre::eyre::{eyre, Report, Result};
use color_eyre::Help;
use itertools::Itertools;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// Default cap on builder iterations.
pub const MAX_ITERATIONS: usize = 20;

// ----------------------------------------------------------------------------
// Arguments
// ----------------------------------------------------------------------------

/// Bounds on the connected triplets sampled to estimate the minimum reconstruction cost.
///
/// The published algorithm takes the minimum over all triplets. Sampling is a tunable
/// approximation of it, not an exact bound: raise the limits to search more triplets.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Sampling {
    /// Number of nodes (in arena order) used as the first vertex.
    pub nodes: usize,
    /// Number of neighbors of each first vertex.
    pub neighbors: usize,
    /// Number of neighbors of each neighbor.
    pub second_neighbors: usize,
}

impl Default for Sampling {
    fn default() -> Self {
        Sampling { nodes: 50, neighbors: 10, second_neighbors: 10 }
    }
}

/// Arguments of the [`MedianJoining`] builder.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BuildArgs {
    /// Feasible-link tolerance, in mutations.
    pub epsilon: usize,
    /// Maximum number of iterations before giving up on convergence.
    pub max_iterations: usize,
    /// Triplet sampling used to estimate the minimum cost.
    pub sampling: Sampling,
}

impl Default for BuildArgs {
    fn default() -> Self {
        BuildArgs { epsilon: 0, max_iterations: MAX_ITERATIONS, sampling: Sampling::default() }
    }
}

// ----------------------------------------------------------------------------
// State
// ----------------------------------------------------------------------------

/// The [`MedianJoining`] builder state.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum State {
    Initial,
    Iterating,
    Converged,
    MaxIterationsReached,
}

impl State {
    /// Returns `true` if no further iterations will run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Converged | State::MaxIterationsReached)
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

// ----------------------------------------------------------------------------
// Median Joining
// ----------------------------------------------------------------------------

/// Builds a median-joining network from haplotypes.
///
/// The builder owns its node arena, an explicit copy of the input haplotypes, and the set of every
/// sequence it has ever held. A sequence that has been seen, including a pruned median, is never
/// added again.
///
/// ## Examples
///
/// Step through the iterations, for hosts that interleave other work.
///
/// ```rust
/// use haplonet_network::{BuildArgs, Haplotype, MedianJoining, State};
///
/// let haplotypes = [("H1", "AAAA"), ("H2", "AAAT"), ("H3", "AATA"), ("H4", "ATAA")]
///     .map(|(id, seq)| Haplotype::new(id, seq, 1));
/// let mut builder = MedianJoining::new(&haplotypes, BuildArgs::default())?;
/// assert_eq!(builder.state(), State::Initial);
///
/// while !builder.step()?.is_terminal() {}
/// assert_eq!(builder.state(), State::Converged);
/// assert_eq!(builder.iteration(), 1);
///
/// let network = builder.finalize()?;
/// assert_eq!(network.edges.len(), 3);
/// assert_eq!(network.degree("H1")?, 3);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(Clone, Debug)]
pub struct MedianJoining {
    args: BuildArgs,
    nodes: Vec<Node>,
    seen: HashSet<String>,
    median_counter: usize,
    iteration: usize,
    state: State,
}

impl MedianJoining {
    /// Returns a new builder over a copy of the haplotypes.
    ///
    /// Fails fast on invalid input: sequences of different lengths, non-ASCII sequences, duplicate
    /// sequences or duplicate ids. These are the responsibility of ingestion.
    pub fn new(haplotypes: &[Haplotype], args: BuildArgs) -> Result<Self, Report> {
        let nodes = haplotypes.iter().map(Node::from).collect_vec();

        if let Some(first) = nodes.first() {
            if let Some(node) = nodes.iter().find(|n| n.sequence.len() != first.sequence.len()) {
                return Err(eyre!(
                    "Invalid input: {} and {} are different lengths ({} vs {}).",
                    first.id,
                    node.id,
                    first.sequence.len(),
                    node.sequence.len()
                )
                .suggestion("Are you sure the sequences are aligned?"));
            }
        }
        if let Some(node) = nodes.iter().find(|n| !n.sequence.is_ascii()) {
            return Err(eyre!("Invalid input: {} contains non-ASCII characters.", node.id));
        }
        if let Some(node) = nodes.iter().duplicates_by(|n| &n.sequence).next() {
            return Err(eyre!("Invalid input: the sequence of {} is duplicated.", node.id)
                .suggestion("Haplotypes must be deduplicated before building the network."));
        }
        if let Some(node) = nodes.iter().duplicates_by(|n| &n.id).next() {
            return Err(eyre!("Invalid input: the id {} is duplicated.", node.id));
        }

        let seen = nodes.iter().map(|node| node.sequence.clone()).collect();

        Ok(MedianJoining { args, nodes, seen, median_counter: 0, iteration: 0, state: State::Initial })
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The number of iterations run so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// The current node arena.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Runs one iteration and returns the new [`State`].
    ///
    /// Pruning strictly precedes growth: an iteration that removes median vectors does not
    /// generate new ones. Stepping a builder in a terminal state does nothing.
    pub fn step(&mut self) -> Result<State, Report> {
        if self.state.is_terminal() {
            return Ok(self.state);
        }

        self.iteration += 1;
        let matrix = DistanceMatrix::from_nodes(&self.nodes)?;
        let network = msn::minimum_spanning_network(&matrix, self.args.epsilon);
        debug!(
            "Iteration {}: {} nodes, {} links, {} feasible",
            self.iteration,
            self.nodes.len(),
            network.links.len(),
            network.feasible().count()
        );

        let pruned = self.prune(&network);
        let changed = if pruned > 0 {
            debug!("Iteration {}: removed {pruned} obsolete median vectors", self.iteration);
            true
        } else {
            let added = self.grow(&network)?;
            debug!("Iteration {}: added {added} median vectors", self.iteration);
            added > 0
        };

        self.state = match (changed, self.iteration >= self.args.max_iterations) {
            (false, _) => {
                info!("Median-joining converged after {} iterations.", self.iteration);
                State::Converged
            }
            (true, true) => {
                warn!(
                    "Median-joining did not converge within {} iterations, using the current network.",
                    self.args.max_iterations
                );
                State::MaxIterationsReached
            }
            (true, false) => State::Iterating,
        };

        Ok(self.state)
    }

    /// Runs until a terminal state, then returns the finalized [`Network`].
    pub fn run(mut self) -> Result<Network, Report> {
        while !self.step()?.is_terminal() {}
        self.finalize()
    }

    /// Returns the published [`Network`]: the feasible links of a final MSN over the current nodes.
    pub fn finalize(&self) -> Result<Network, Report> {
        let matrix = DistanceMatrix::from_nodes(&self.nodes)?;
        let spanning = msn::minimum_spanning_network(&matrix, self.args.epsilon);

        let edges = spanning
            .feasible()
            .map(|link| Edge {
                source: self.nodes[link.source].id.clone(),
                target: self.nodes[link.target].id.clone(),
                distance: link.distance,
            })
            .collect_vec();

        let network = Network { nodes: self.nodes.clone(), edges, original_layout: None };
        info!(
            "Final network: {} nodes ({} median vectors), {} edges.",
            network.nodes.len(),
            network.median_count(),
            network.edges.len()
        );
        let components = network.component_count()?;
        if components > 1 {
            warn!("Final network has {components} disconnected components.");
        }

        Ok(network)
    }

    /// Removes median vectors with degree < 2, returns the number removed.
    ///
    /// Sampled haplotypes are never removed, even when isolated.
    fn prune(&mut self, network: &SpanningNetwork) -> usize {
        let degrees = network.degrees(self.nodes.len());
        let before = self.nodes.len();
        let mut degrees = degrees.into_iter();
        self.nodes.retain(|node| {
            let degree = degrees.next().unwrap_or_default();
            !node.is_median || degree >= 2
        });
        before - self.nodes.len()
    }

    /// Estimates the minimum reconstruction cost over sampled connected triplets.
    ///
    /// Only candidates that are not yet in the network count. Returns 0 when no triplet yields one.
    fn min_cost(&self, network: &SpanningNetwork) -> Result<usize, Report> {
        let sampling = self.args.sampling;
        let adjacency = network.adjacency(self.nodes.len());
        let mut min_cost: Option<usize> = None;

        for u in 0..self.nodes.len().min(sampling.nodes) {
            for &v in adjacency[u].iter().take(sampling.neighbors) {
                for &w in adjacency[v].iter().take(sampling.second_neighbors) {
                    if w == u {
                        continue;
                    }
                    let (a, b, c) =
                        (&self.nodes[u].sequence, &self.nodes[v].sequence, &self.nodes[w].sequence);
                    for median in quasi_medians(a, b, c)? {
                        if self.seen.contains(&median) {
                            continue;
                        }
                        let cost = median_cost(a, b, c, &median)?;
                        min_cost = Some(min_cost.map_or(cost, |min| min.min(cost)));
                    }
                }
            }
        }

        Ok(min_cost.unwrap_or(0))
    }

    /// Adds the quasi-medians of feasible triplets within `epsilon` of the minimum cost, returns
    /// the number added.
    fn grow(&mut self, network: &SpanningNetwork) -> Result<usize, Report> {
        let min_cost = self.min_cost(network)?;
        let max_cost = min_cost + self.args.epsilon;
        debug!("Iteration {}: minimum cost {min_cost}", self.iteration);

        let feasible = network.feasible().collect_vec();
        let mut medians = Vec::new();
        let mut truncated = 0;

        for (i, first) in feasible.iter().enumerate() {
            let (u, v) = (first.source, first.target);
            for second in &feasible[i + 1..] {
                // the second link must share an endpoint with the first
                let w = if second.source == u || second.source == v {
                    second.target
                } else if second.target == u || second.target == v {
                    second.source
                } else {
                    continue;
                };
                if w == u || w == v {
                    continue;
                }

                let (a, b, c) =
                    (&self.nodes[u].sequence, &self.nodes[v].sequence, &self.nodes[w].sequence);
                let (candidates, dropped) = quasi_median::expand(a, b, c)?;
                if dropped > 0 {
                    truncated += 1;
                }
                for median in candidates {
                    if self.seen.contains(&median) {
                        continue;
                    }
                    if median_cost(a, b, c, &median)? <= max_cost {
                        self.seen.insert(median.clone());
                        medians.push(median);
                    }
                }
            }
        }

        if truncated > 0 {
            warn!(
                "Iteration {}: {truncated} triplets have more than {MAX_AMBIGUOUS_POSITIONS} ambiguous positions, only the first {MAX_AMBIGUOUS_POSITIONS} were expanded.",
                self.iteration
            );
        }

        let added = medians.len();
        medians.into_iter().for_each(|sequence| {
            self.median_counter += 1;
            self.nodes.push(Node::median(format!("MV{}", self.median_counter), sequence));
        });

        Ok(added)
    }
}

/// Builds a median-joining network with default arguments and the given `epsilon`.
///
/// No haplotypes yields an empty network.
///
/// ```rust
/// use haplonet_network::{median_joining, Haplotype};
/// let network = median_joining::build(&[Haplotype::new("H1", "ACGT", 3)], 0)?;
/// assert_eq!(network.nodes.len(), 1);
/// assert!(network.edges.is_empty());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn build(haplotypes: &[Haplotype], epsilon: usize) -> Result<Network, Report> {
    let args = BuildArgs { epsilon, ..Default::default() };
    MedianJoining::new(haplotypes, args)?.run()
}
