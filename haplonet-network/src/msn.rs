//! Minimum spanning network (MSN) with feasible-link classification.
//!
//! The MSN is the superposition of all spanning trees whose total length is within `epsilon` of
//! the minimum. Two partitions of the nodes are maintained while links are added in increasing
//! order of distance:
//!
//! - the network partition tracks which nodes the links added so far have connected.
//! - the threshold partition joins every pair strictly closer than the current distance minus
//!   `epsilon`. A link is _feasible_ when its endpoints are still apart in this partition, i.e. no
//!   strictly shorter path already connects them.

use crate::DistanceMatrix;
use itertools::Itertools;
use log::debug;
use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Partition
// ----------------------------------------------------------------------------

/// A partition of node indices into disjoint components.
///
/// Backed by petgraph's [`UnionFind`] (path compression and union by rank) with a running count
/// of components.
#[derive(Clone, Debug)]
pub struct Partition {
    sets: UnionFind<usize>,
    components: usize,
}

impl Partition {
    /// Returns a partition of `n` singleton components.
    pub fn new(n: usize) -> Self {
        Partition { sets: UnionFind::new(n), components: n }
    }

    /// Merges the components of `a` and `b`, returns `false` if they were already joined.
    ///
    /// ```rust
    /// use haplonet_network::msn::Partition;
    /// let mut partition = Partition::new(3);
    /// assert!(partition.union(0, 2));
    /// assert!(!partition.union(2, 0));
    /// assert!(partition.same(0, 2));
    /// assert_eq!(partition.components(), 2);
    /// ```
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let merged = self.sets.union(a, b);
        if merged {
            self.components -= 1;
        }
        merged
    }

    /// Returns `true` if `a` and `b` are in the same component.
    pub fn same(&mut self, a: usize, b: usize) -> bool {
        self.sets.find_mut(a) == self.sets.find_mut(b)
    }

    /// Returns the number of components.
    pub fn components(&self) -> usize {
        self.components
    }

    /// Returns the representative of each index, in index order.
    pub fn labels(&self) -> Vec<usize> {
        self.sets.clone().into_labeling()
    }
}

// ----------------------------------------------------------------------------
// Spanning Network
// ----------------------------------------------------------------------------

/// A link of the [`SpanningNetwork`] between two node indices.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    pub distance: usize,
    /// The link joins two components of the threshold partition.
    pub feasible: bool,
}

/// All links of a minimum spanning network, in the order they were added.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SpanningNetwork {
    pub links: Vec<Link>,
}

impl SpanningNetwork {
    /// Returns the feasible links, in the order they were added.
    pub fn feasible(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(|link| link.feasible)
    }

    /// Returns the number of links incident to each of the `n` nodes.
    pub fn degrees(&self, n: usize) -> Vec<usize> {
        let mut degrees = vec![0; n];
        self.links.iter().for_each(|link| {
            degrees[link.source] += 1;
            degrees[link.target] += 1;
        });
        degrees
    }

    /// Returns the neighbors of each of the `n` nodes, in link order.
    pub fn adjacency(&self, n: usize) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); n];
        self.links.iter().for_each(|link| {
            adjacency[link.source].push(link.target);
            adjacency[link.target].push(link.source);
        });
        adjacency
    }
}

/// Returns the minimum spanning network over the nodes of a [`DistanceMatrix`].
///
/// Pairs are visited in increasing distance `d` (ties keep index order). Before each pair, the
/// threshold partition absorbs every pair with distance `< d - epsilon`. Every visited pair
/// becomes a link, feasible iff its endpoints are apart in the threshold partition. Once the
/// links connect all nodes at distance `d`, pairs beyond `d + epsilon` are skipped.
///
/// Pairs are sorted once, so the threshold pairs are absorbed with a single cursor that only moves
/// forward as `d` grows.
///
/// ## Examples
///
/// ```rust
/// use haplonet_network::{msn, DistanceMatrix, Haplotype, Node};
/// let nodes = [("H1", "AAAA"), ("H2", "AAAT"), ("H3", "AATA"), ("H4", "ATAA")]
///     .map(|(id, seq)| Node::from(&Haplotype::new(id, seq, 1)));
/// let matrix = DistanceMatrix::from_nodes(&nodes)?;
/// let network = msn::minimum_spanning_network(&matrix, 0);
///
/// // a star around H1, the 2-mutation pairs are never visited
/// assert_eq!(network.links.len(), 3);
/// assert!(network.links.iter().all(|link| link.source == 0 && link.feasible));
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn minimum_spanning_network(matrix: &DistanceMatrix, epsilon: usize) -> SpanningNetwork {
    let n = matrix.len();
    let mut network = SpanningNetwork::default();
    if n < 2 {
        return network;
    }

    // all unordered pairs, sorted by distance (stable)
    let pairs = (0..n)
        .tuple_combinations()
        .map(|(i, j)| (i, j, matrix[(i, j)]))
        .sorted_by_key(|(_, _, d)| *d)
        .collect_vec();

    let mut msn = Partition::new(n);
    let mut threshold = Partition::new(n);
    let mut cursor = 0;
    let mut max_value: Option<usize> = None;

    for &(i, j, d) in &pairs {
        if max_value.is_some_and(|max| d > max) {
            break;
        }

        // dist < d - epsilon, without underflow
        while cursor < pairs.len() && pairs[cursor].2 + epsilon < d {
            let (u, v, _) = pairs[cursor];
            threshold.union(u, v);
            cursor += 1;
        }

        let feasible = !threshold.same(i, j);
        network.links.push(Link { source: i, target: j, distance: d, feasible });

        msn.union(i, j);
        if max_value.is_none() && msn.components() == 1 {
            max_value = Some(d + epsilon);
        }
    }

    debug!(
        "MSN: {} links, {} feasible, {} components",
        network.links.len(),
        network.feasible().count(),
        msn.components()
    );

    network
}

#[cfg(test)]
mod tests;
